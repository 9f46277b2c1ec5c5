use crate::error::TaggerError;

/// Quotes `text` the way it would appear in a JSON string, for error messages.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("{:?}", text))
}

pub fn error(msg: &str, line: usize, column: usize) -> TaggerError {
    TaggerError::ParseError {
        msg: msg.to_string(),
        line,
        column,
    }
}
