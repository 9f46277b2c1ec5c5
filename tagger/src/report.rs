use std::path::Path;

use serde::Serialize;

use crate::{
    config::{Config, Mode},
    error::TaggerError,
    process::Rewrite,
    walker::FieldChange,
};

/// Machine-readable summary of one run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub file:    &'a Path,
    pub key:     &'a str,
    pub mode:    Mode,
    pub changed: bool,
    pub dry_run: bool,
    pub changes: &'a [FieldChange],
}

impl<'a> Report<'a> {
    pub fn new(config: &'a Config, rewrite: &'a Rewrite) -> Self {
        Report {
            file:    &config.path,
            key:     &config.key,
            mode:    config.mode,
            changed: rewrite.changed(),
            dry_run: config.dry_run,
            changes: &rewrite.changes,
        }
    }

    pub fn to_json(&self) -> Result<String, TaggerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
