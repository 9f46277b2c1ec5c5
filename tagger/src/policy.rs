use serde::Serialize;

use crate::config::Mode;

/// What a field's tag says about the serialization key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation<'a> {
    /// The field has no tag at all.
    Missing,
    /// The field has a tag without the key.
    KeyAbsent,
    /// The key is present with this value.
    Present(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewritePlan {
    NoChange,
    CreateAnnotation(String),
    AppendSerializationKey(String),
    ReplaceSerializationValue(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Created,
    Appended,
    Replaced,
}

impl RewritePlan {
    pub fn action(&self) -> Option<Action> {
        match self {
            RewritePlan::NoChange => None,
            RewritePlan::CreateAnnotation(_) => Some(Action::Created),
            RewritePlan::AppendSerializationKey(_) => Some(Action::Appended),
            RewritePlan::ReplaceSerializationValue(_) => Some(Action::Replaced),
        }
    }

    /// The serialization key's new value, options included.
    pub fn value(&self) -> Option<&str> {
        match self {
            RewritePlan::NoChange => None,
            RewritePlan::CreateAnnotation(v)
            | RewritePlan::AppendSerializationKey(v)
            | RewritePlan::ReplaceSerializationValue(v) => Some(v),
        }
    }
}

/// Decides how one field's tag changes. Embedded fields (`None` name) are
/// never touched.
pub fn resolve(field_name: Option<&str>, annotation: Annotation<'_>, mode: Mode) -> RewritePlan {
    let Some(name) = field_name.filter(|n| !n.is_empty()) else {
        return RewritePlan::NoChange;
    };

    match annotation {
        Annotation::Missing | Annotation::KeyAbsent => {
            // A blank field `_` has no name to derive a key from.
            let renamed = mode.transform(name);
            if renamed.is_empty() {
                RewritePlan::NoChange
            } else if annotation == Annotation::Missing {
                RewritePlan::CreateAnnotation(renamed)
            } else {
                RewritePlan::AppendSerializationKey(renamed)
            }
        }
        Annotation::Present(value) => {
            let (primary, options) = match value.split_once(',') {
                Some((primary, options)) => (primary, Some(options)),
                None => (value, None),
            };
            // "-" hides the field from the encoder.
            if primary.is_empty() || primary == "-" {
                return RewritePlan::NoChange;
            }
            let renamed = mode.transform(primary);
            if renamed.is_empty() || renamed == primary {
                return RewritePlan::NoChange;
            }
            let value = match options {
                Some(options) => format!("{},{}", renamed, options),
                None => renamed,
            };
            RewritePlan::ReplaceSerializationValue(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tag_creates_annotation() {
        assert_eq!(
            resolve(Some("FirstName"), Annotation::Missing, Mode::Snake),
            RewritePlan::CreateAnnotation("first_name".into())
        );
        assert_eq!(
            resolve(Some("FirstName"), Annotation::Missing, Mode::LowerCamel),
            RewritePlan::CreateAnnotation("firstName".into())
        );
    }

    #[test]
    fn test_absent_key_appends() {
        assert_eq!(
            resolve(Some("ID"), Annotation::KeyAbsent, Mode::LowerCamel),
            RewritePlan::AppendSerializationKey("id".into())
        );
    }

    #[test]
    fn test_present_key_is_replaced_with_options_kept() {
        assert_eq!(
            resolve(Some("LastName"), Annotation::Present("lastName,omitempty"), Mode::Snake),
            RewritePlan::ReplaceSerializationValue("last_name,omitempty".into())
        );
        assert_eq!(
            resolve(Some("X"), Annotation::Present("home_address,omitempty,string"), Mode::LowerCamel),
            RewritePlan::ReplaceSerializationValue("homeAddress,omitempty,string".into())
        );
    }

    #[test]
    fn test_value_wins_over_field_name() {
        assert_eq!(
            resolve(Some("ID"), Annotation::Present("person_id"), Mode::LowerCamel),
            RewritePlan::ReplaceSerializationValue("personId".into())
        );
    }

    #[test]
    fn test_already_converted_is_no_change() {
        assert_eq!(
            resolve(Some("FirstName"), Annotation::Present("firstName"), Mode::LowerCamel),
            RewritePlan::NoChange
        );
        assert_eq!(
            resolve(Some("Address"), Annotation::Present("home_address"), Mode::Snake),
            RewritePlan::NoChange
        );
    }

    #[test]
    fn test_empty_and_skip_primaries_are_no_change() {
        for value in ["", ",omitempty", "-", "-,"] {
            for mode in [Mode::Snake, Mode::LowerCamel] {
                assert_eq!(
                    resolve(Some("Field"), Annotation::Present(value), mode),
                    RewritePlan::NoChange,
                    "value {:?}",
                    value
                );
            }
        }
    }

    #[test]
    fn test_embedded_field_is_skipped() {
        assert_eq!(resolve(None, Annotation::Missing, Mode::Snake), RewritePlan::NoChange);
        assert_eq!(resolve(Some(""), Annotation::KeyAbsent, Mode::Snake), RewritePlan::NoChange);
        assert_eq!(resolve(Some("_"), Annotation::Missing, Mode::LowerCamel), RewritePlan::NoChange);
    }

    #[test]
    fn test_plan_accessors() {
        let plan = RewritePlan::AppendSerializationKey("id".into());
        assert_eq!(plan.action(), Some(Action::Appended));
        assert_eq!(plan.value(), Some("id"));
        assert_eq!(RewritePlan::NoChange.action(), None);
    }
}
