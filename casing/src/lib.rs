//! jsontagger-casing
//!
//! Identifier transforms between naming conventions:
//!  - `to_snake`:       `homeAddress` → `home_address`
//!  - `to_lower_camel`: `home_address` → `homeAddress`
//!
//! Both functions are total and idempotent. They share one word splitter, so
//! converting back and forth between the two conventions is stable.

/// Splits an identifier into its words.
///
/// - `_`, `-`, `.` and whitespace separate words and are dropped.
/// - An upper-case letter starts a new word when it follows a lower-case
///   letter or a digit.
/// - Inside a run of capitals, the last capital starts a new word when a
///   lower-case letter follows it, so acronyms stay intact
///   (e.g. "HTTPServer" becomes "HTTP", "Server" and "sessionID" becomes
///   "session", "ID").
/// - Digits stay attached to the word they follow.
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for i in 0..chars.len() {
        let c = chars[i];
        if is_separator(c) {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            if !prev.is_uppercase() || (i + 1 < chars.len() && chars[i + 1].is_lowercase()) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Converts an identifier to snake_case.
pub fn to_snake(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Converts an identifier to lowerCamelCase.
/// The first word is lower-cased; every following word gets an upper-case
/// first letter and a lower-case remainder (`UserID` becomes `userId`).
///
/// Adjacent single-letter words would render as a capital run that splits
/// back as one acronym (`pos_x_y` -> `posXY` -> `posXy`), so the result is
/// taken to its fixed point. Each step can only merge words, so this ends.
pub fn to_lower_camel(s: &str) -> String {
    let mut current = camel_step(s);
    loop {
        let next = camel_step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn camel_step(s: &str) -> String {
    split_words(s)
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i == 0 {
                word.to_lowercase()
            } else {
                capitalize(word)
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().to_string() + &chars.as_str().to_lowercase(),
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | '.') || c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("home_address"), vec!["home", "address"]);
        assert_eq!(split_words("firstName"), vec!["first", "Name"]);
        assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
        assert_eq!(split_words("sessionID"), vec!["session", "ID"]);
        assert_eq!(split_words("v2Name"), vec!["v2", "Name"]);
        assert_eq!(split_words("__a--b..c  d"), vec!["a", "b", "c", "d"]);
        assert!(split_words("").is_empty());
        assert!(split_words("_-_").is_empty());
    }

    #[test]
    fn test_to_snake() {
        assert_eq!(to_snake("firstName"), "first_name");
        assert_eq!(to_snake("lastName"), "last_name");
        assert_eq!(to_snake("person_id"), "person_id");
        assert_eq!(to_snake("ID"), "id");
        assert_eq!(to_snake("UserID"), "user_id");
        assert_eq!(to_snake("DateOfBirth"), "date_of_birth");
        assert_eq!(to_snake("HTTPServer"), "http_server");
        assert_eq!(to_snake(""), "");
    }

    #[test]
    fn test_to_lower_camel() {
        assert_eq!(to_lower_camel("person_id"), "personId");
        assert_eq!(to_lower_camel("home_address"), "homeAddress");
        assert_eq!(to_lower_camel("firstName"), "firstName");
        assert_eq!(to_lower_camel("FirstName"), "firstName");
        assert_eq!(to_lower_camel("ID"), "id");
        assert_eq!(to_lower_camel("ProductID"), "productId");
        assert_eq!(to_lower_camel("street_name"), "streetName");
        assert_eq!(to_lower_camel(""), "");
    }

    #[test]
    fn test_transforms_are_idempotent() {
        let inputs = [
            "person_id", "firstName", "ProductID", "HTTPServer", "id2Name", "field_2", "URL",
            "pos_x_y", "a_b_c", "A_B_C", "x_y", "get_a_b_value",
        ];
        for input in inputs {
            let snake = to_snake(input);
            assert_eq!(to_snake(&snake), snake, "to_snake not idempotent for {input}");
            let camel = to_lower_camel(input);
            assert_eq!(to_lower_camel(&camel), camel, "to_lower_camel not idempotent for {input}");
        }
    }

    #[test]
    fn test_single_letter_words_settle_in_camel_case() {
        assert_eq!(to_lower_camel("pos_x_y"), "posXy");
        assert_eq!(to_lower_camel("posXy"), "posXy");
        assert_eq!(to_lower_camel("posXY"), "posXy");
        assert_eq!(to_lower_camel("A_B_C"), "aBc");
        assert_eq!(to_lower_camel("a_b_c"), "aBc");
        assert_eq!(to_lower_camel("x_y"), "xY");
        assert_eq!(to_lower_camel("ProductID"), "productId");
    }

    #[test]
    fn test_round_trip_between_conventions() {
        for snake in ["person_id", "home_address", "date_of_birth"] {
            assert_eq!(to_snake(&to_lower_camel(snake)), snake);
        }
        for camel in ["personId", "homeAddress", "dateOfBirth"] {
            assert_eq!(to_lower_camel(&to_snake(camel)), camel);
        }
    }
}
