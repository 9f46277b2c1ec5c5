use crate::{policy::RewritePlan, tag::TagLiteral};

/// Applies a plan to a field's tag. Returns the new literal, or `None` when
/// the plan leaves the tag as it is.
///
/// Only the serialization entry is touched: other keys, their order and the
/// whitespace between them come back exactly as parsed.
pub fn reconstruct(existing: Option<TagLiteral>, key: &str, plan: &RewritePlan) -> Option<TagLiteral> {
    match plan {
        RewritePlan::NoChange => None,
        RewritePlan::CreateAnnotation(value) => Some(TagLiteral::with_entry(key, value)),
        RewritePlan::AppendSerializationKey(value) => {
            let mut tag = existing.unwrap_or_else(|| TagLiteral::with_entry(key, value));
            if tag.lookup(key).is_none() {
                tag.push(key, value);
            }
            Some(tag)
        }
        RewritePlan::ReplaceSerializationValue(value) => {
            let mut tag = existing?;
            tag.set(key, value).then_some(tag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(existing: &str, plan: RewritePlan) -> Option<String> {
        reconstruct(TagLiteral::parse(existing), "json", &plan).map(|tag| tag.render())
    }

    #[test]
    fn test_create() {
        let tag = reconstruct(None, "json", &RewritePlan::CreateAnnotation("first_name".into()));
        assert_eq!(tag.unwrap().render(), r#"`json:"first_name"`"#);
    }

    #[test]
    fn test_append_keeps_existing_keys() {
        assert_eq!(
            render(r#"`db:"project_id"`"#, RewritePlan::AppendSerializationKey("id".into())).unwrap(),
            r#"`db:"project_id" json:"id"`"#
        );
    }

    #[test]
    fn test_replace_keeps_neighbours_and_options() {
        assert_eq!(
            render(
                r#"`validate:"required" json:"last_name,omitempty" db:"ln"`"#,
                RewritePlan::ReplaceSerializationValue("lastName,omitempty".into())
            )
            .unwrap(),
            r#"`validate:"required" json:"lastName,omitempty" db:"ln"`"#
        );
    }

    #[test]
    fn test_replace_without_key_is_no_change() {
        assert_eq!(
            render(r#"`db:"x"`"#, RewritePlan::ReplaceSerializationValue("y".into())),
            None
        );
        assert_eq!(reconstruct(None, "json", &RewritePlan::ReplaceSerializationValue("y".into())), None);
    }

    #[test]
    fn test_no_change() {
        assert_eq!(render(r#"`json:"a"`"#, RewritePlan::NoChange), None);
    }
}
