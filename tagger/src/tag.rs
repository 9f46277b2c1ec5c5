//! Struct tag literals as an ordered list of segments.
//!
//! A tag such as `` `db:"id" json:"user_id,omitempty"` `` is split into key
//! entries and the opaque text between them. Rendering concatenates the
//! segments again, so every byte outside an edited entry value is kept.

/// How the literal is delimited in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `` `...` ``
    Raw,
    /// `"..."`, where inner quotes are written `\"`.
    Interpreted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub key:   String,
    /// The quoted value without its quotes, escapes left as written.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Entry(TagEntry),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLiteral {
    delimiter: Delimiter,
    segments:  Vec<Segment>,
}

impl TagLiteral {
    /// A fresh raw literal holding a single entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        TagLiteral {
            delimiter: Delimiter::Raw,
            segments:  vec![Segment::Entry(TagEntry {
                key:   key.to_string(),
                value: value.to_string(),
            })],
        }
    }

    /// Parses a tag literal as written in source, delimiters included.
    ///
    /// Returns `None` when the literal is not a string literal, or when an
    /// interpreted literal uses escapes other than `\"` and `\\`; such tags
    /// are left alone.
    pub fn parse(literal: &str) -> Option<Self> {
        let (delimiter, content) = if let Some(inner) = strip_delimiters(literal, '`') {
            (Delimiter::Raw, inner.to_string())
        } else if let Some(inner) = strip_delimiters(literal, '"') {
            (Delimiter::Interpreted, unescape(inner)?)
        } else {
            return None;
        };
        Some(TagLiteral {
            delimiter,
            segments: parse_segments(&content),
        })
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn entries(&self) -> impl Iterator<Item = &TagEntry> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Entry(entry) => Some(entry),
            Segment::Text(_) => None,
        })
    }

    /// Value of the first entry named exactly `key`.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    /// Replaces the value of the first entry named `key`. Returns false when
    /// there is no such entry.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        for segment in &mut self.segments {
            if let Segment::Entry(entry) = segment {
                if entry.key == key {
                    entry.value = value.to_string();
                    return true;
                }
            }
        }
        false
    }

    /// Appends an entry, separated from existing content by one space.
    pub fn push(&mut self, key: &str, value: &str) {
        if !self.content().is_empty() {
            self.segments.push(Segment::Text(" ".to_string()));
        }
        self.segments.push(Segment::Entry(TagEntry {
            key:   key.to_string(),
            value: value.to_string(),
        }));
    }

    /// The tag content without delimiters, as the Go runtime sees it.
    pub fn content(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Entry(entry) => format!("{}:\"{}\"", entry.key, entry.value),
                Segment::Text(text) => text.clone(),
            })
            .collect()
    }

    /// The literal as it should be written back into source.
    pub fn render(&self) -> String {
        match self.delimiter {
            Delimiter::Raw => format!("`{}`", self.content()),
            Delimiter::Interpreted => format!("\"{}\"", escape(&self.content())),
        }
    }
}

fn strip_delimiters(literal: &str, delimiter: char) -> Option<&str> {
    literal
        .strip_prefix(delimiter)?
        .strip_suffix(delimiter)
}

fn unescape(inner: &str) -> Option<String> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('"' | '\\')) => out.push(escaped),
            _ => return None,
        }
    }
    Some(out)
}

fn escape(content: &str) -> String {
    content.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Splits tag content with the grammar of Go's `reflect.StructTag`:
/// space-separated `key:"value"` pairs. Anything that does not fit the
/// grammar is kept as opaque text, up to the end of the content.
fn parse_segments(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = content;

    while !rest.is_empty() {
        let trimmed = rest.trim_start_matches(' ');
        if trimmed.len() != rest.len() {
            segments.push(Segment::Text(rest[..rest.len() - trimmed.len()].to_string()));
            rest = trimmed;
            continue;
        }
        match parse_entry(rest) {
            Some((entry, consumed)) => {
                segments.push(Segment::Entry(entry));
                rest = &rest[consumed..];
            }
            None => {
                segments.push(Segment::Text(rest.to_string()));
                break;
            }
        }
    }
    segments
}

/// Parses one `key:"value"` at the start of `input`, returning the entry and
/// the number of bytes it spans.
fn parse_entry(input: &str) -> Option<(TagEntry, usize)> {
    let key_len = input
        .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
        .unwrap_or(input.len());
    if key_len == 0 || !input[key_len..].starts_with(":\"") {
        return None;
    }

    let value_start = key_len + 2;
    let mut escaped = false;
    for (offset, c) in input[value_start..].char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            let value_end = value_start + offset;
            let entry = TagEntry {
                key:   input[..key_len].to_string(),
                value: input[value_start..value_end].to_string(),
            };
            return Some((entry, value_end + 1));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries_in_order() {
        let tag = TagLiteral::parse(r#"`db:"project_id" json:"id,omitempty" validate:"required"`"#).unwrap();
        let keys: Vec<&str> = tag.entries().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["db", "json", "validate"]);
        assert_eq!(tag.lookup("json"), Some("id,omitempty"));
        assert_eq!(tag.lookup("yaml"), None);
        assert_eq!(tag.delimiter(), Delimiter::Raw);
    }

    #[test]
    fn test_lookup_matches_whole_key() {
        let tag = TagLiteral::parse(r#"`myjson:"a" json:"b"`"#).unwrap();
        assert_eq!(tag.lookup("json"), Some("b"));
    }

    #[test]
    fn test_lookup_returns_first_of_repeated_keys() {
        let mut tag = TagLiteral::parse(r#"`json:"a" json:"b"`"#).unwrap();
        assert_eq!(tag.lookup("json"), Some("a"));
        assert!(tag.set("json", "c"));
        assert_eq!(tag.render(), r#"`json:"c" json:"b"`"#);
    }

    #[test]
    fn test_render_preserves_spacing_and_opaque_tail() {
        let input = r#"`db:"x"   json:"first_name"  broken:tail`"#;
        let mut tag = TagLiteral::parse(input).unwrap();
        assert_eq!(tag.render(), input);
        tag.set("json", "firstName");
        assert_eq!(tag.render(), r#"`db:"x"   json:"firstName"  broken:tail`"#);
    }

    #[test]
    fn test_empty_value_is_an_entry() {
        let tag = TagLiteral::parse(r#"`json:""`"#).unwrap();
        assert_eq!(tag.lookup("json"), Some(""));
    }

    #[test]
    fn test_escaped_quote_inside_value() {
        let tag = TagLiteral::parse(r#"`doc:"say \"hi\"" json:"a"`"#).unwrap();
        assert_eq!(tag.lookup("doc"), Some(r#"say \"hi\""#));
        assert_eq!(tag.lookup("json"), Some("a"));
    }

    #[test]
    fn test_push_separates_with_one_space() {
        let mut tag = TagLiteral::parse(r#"`db:"id"`"#).unwrap();
        tag.push("json", "id");
        assert_eq!(tag.render(), r#"`db:"id" json:"id"`"#);

        let mut empty = TagLiteral::parse("``").unwrap();
        empty.push("json", "id");
        assert_eq!(empty.render(), r#"`json:"id"`"#);
    }

    #[test]
    fn test_interpreted_literal_round_trip() {
        let input = r#""json:\"user_id\" db:\"uid\"""#;
        let mut tag = TagLiteral::parse(input).unwrap();
        assert_eq!(tag.delimiter(), Delimiter::Interpreted);
        assert_eq!(tag.lookup("json"), Some("user_id"));
        assert_eq!(tag.render(), input);
        tag.set("json", "userId");
        assert_eq!(tag.render(), r#""json:\"userId\" db:\"uid\"""#);
    }

    #[test]
    fn test_interpreted_literal_with_other_escapes_is_opaque() {
        assert!(TagLiteral::parse(r#""json:\"a\"\n""#).is_none());
        assert!(TagLiteral::parse("not a literal").is_none());
    }

    #[test]
    fn test_with_entry() {
        assert_eq!(TagLiteral::with_entry("json", "id").render(), r#"`json:"id"`"#);
    }
}
