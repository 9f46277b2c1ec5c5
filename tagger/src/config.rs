use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::{error::TaggerError, utils::quote};

pub const DEFAULT_KEY: &str = "json";

/// Target naming convention for tag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Snake,
    LowerCamel,
}

impl Mode {
    /// Resolves the two command-line intents. Neither selects lowerCamelCase;
    /// both select snake_case.
    pub fn from_flags(snake: bool, camel: bool) -> Mode {
        match (snake, camel) {
            (true, true) => {
                debug!("both snake and camel requested, using snake_case");
                Mode::Snake
            }
            (true, false) => Mode::Snake,
            (false, _) => Mode::LowerCamel,
        }
    }

    pub fn transform(self, ident: &str) -> String {
        match self {
            Mode::Snake => jsontagger_casing::to_snake(ident),
            Mode::LowerCamel => jsontagger_casing::to_lower_camel(ident),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Snake => f.write_str("snake_case"),
            Mode::LowerCamel => f.write_str("lowerCamelCase"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub path:    PathBuf,
    pub key:     String,
    pub mode:    Mode,
    /// Compute the rewrite without touching the file.
    pub dry_run: bool,
}

impl Config {
    pub fn new(path: Option<PathBuf>, key: &str, mode: Mode, dry_run: bool) -> Result<Config, TaggerError> {
        let path = path.ok_or(TaggerError::MissingFile)?;
        validate_key(key)?;
        Ok(Config {
            path,
            key: key.to_string(),
            mode,
            dry_run,
        })
    }
}

/// A tag key must be non-empty and free of spaces, control characters,
/// colons and quotes.
fn validate_key(key: &str) -> Result<(), TaggerError> {
    let invalid = key.is_empty()
        || key
            .chars()
            .any(|c| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}');
    if invalid {
        Err(TaggerError::InvalidKey(quote(key)))
    } else {
        Ok(())
    }
}
