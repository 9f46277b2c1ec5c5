use serde::Serialize;
use tracing::debug;

use crate::{
    config::Mode,
    policy::{resolve, Action, Annotation},
    rewrite::reconstruct,
    tag::TagLiteral,
    types::{FieldDecl, SourceFile, Tag},
};

/// One field whose tag was rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub type_name: String,
    pub field:     String,
    pub line:      usize,
    pub action:    Action,
    /// The key's previous value, if it had one.
    pub before:    Option<String>,
    pub after:     String,
}

/// Rewrites the `key` entry of every named field of every struct in `file`,
/// returning the changes in source order. An empty result means the file is
/// untouched.
pub fn rewrite_tree(file: &mut SourceFile, key: &str, mode: Mode) -> Vec<FieldChange> {
    file.structs
        .iter_mut()
        .flat_map(|decl| {
            let type_name = decl.name.clone();
            decl.fields
                .iter_mut()
                .filter_map(move |field| rewrite_field(&type_name, field, key, mode))
        })
        .collect()
}

fn rewrite_field(type_name: &str, field: &mut FieldDecl, key: &str, mode: Mode) -> Option<FieldChange> {
    let name = field.names.first()?.clone();

    let literal = match &field.tag {
        None => None,
        Some(tag) => match TagLiteral::parse(&tag.text) {
            Some(literal) => Some(literal),
            None => {
                debug!(type_name, field = %name, tag = %tag.text, "leaving tag with unsupported escapes");
                return None;
            }
        },
    };

    let annotation = match &literal {
        None => Annotation::Missing,
        Some(literal) => literal.lookup(key).map_or(Annotation::KeyAbsent, Annotation::Present),
    };
    let before = match annotation {
        Annotation::Present(value) => Some(value.to_string()),
        _ => None,
    };
    let plan = resolve(Some(&name), annotation, mode);
    let (action, after) = (plan.action()?, plan.value()?.to_string());
    let rendered = reconstruct(literal, key, &plan)?.render();

    debug!(type_name, field = %name, ?action, ?before, %after, "rewriting tag");
    match &mut field.tag {
        Some(tag) => tag.text = rendered,
        None => {
            field.tag = Some(Tag {
                text: rendered,
                span: None,
            })
        }
    }

    Some(FieldChange {
        type_name: type_name.to_string(),
        field: name,
        line: field.line,
        action,
        before,
        after,
    })
}
