use std::{fs, io::Write, path::Path};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{
    config::{Config, Mode},
    error::TaggerError,
    parser::parse_source,
    printer::print_source,
    walker::{rewrite_tree, FieldChange},
};

/// Result of rewriting one source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewrite {
    pub changes: Vec<FieldChange>,
    /// The new source, `None` when no field changed.
    pub output:  Option<String>,
}

impl Rewrite {
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Parse → rewrite tags → print. Pure; no I/O.
pub fn rewrite_source(text: &str, key: &str, mode: Mode) -> Result<Rewrite, TaggerError> {
    let mut file = parse_source(text)?;
    debug!(package = %file.package, structs = file.structs.len(), "parsed source");

    let changes = rewrite_tree(&mut file, key, mode);
    let output = if changes.is_empty() {
        None
    } else {
        Some(print_source(&file))
    };
    Ok(Rewrite { changes, output })
}

/// Rewrites `config.path` in place. The file is only written when a field
/// changed and `dry_run` is off; a parse failure leaves it untouched.
pub fn process_file(config: &Config) -> Result<Rewrite, TaggerError> {
    let text = fs::read_to_string(&config.path).map_err(|source| TaggerError::Read {
        path: config.path.clone(),
        source,
    })?;

    let rewrite = rewrite_source(&text, &config.key, config.mode)?;
    match &rewrite.output {
        Some(output) if !config.dry_run => {
            write_atomic(&config.path, output)?;
            info!(path = %config.path.display(), changes = rewrite.changes.len(), "rewrote tags");
        }
        Some(_) => debug!(path = %config.path.display(), "dry run, not writing"),
        None => debug!(path = %config.path.display(), "nothing to rewrite"),
    }
    Ok(rewrite)
}

/// Writes `contents` to a temporary file next to `path`, then renames it over
/// `path`, so a failed write never truncates the original.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), TaggerError> {
    let write_error = |source: std::io::Error| TaggerError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(contents.as_bytes()).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), metadata.permissions()).map_err(write_error)?;
    }
    tmp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_source_without_changes() {
        let input = "package p\n\ntype T struct {\n\tName string `json:\"name\"`\n}\n";
        let rewrite = rewrite_source(input, "json", Mode::Snake).unwrap();
        assert!(!rewrite.changed());
        assert_eq!(rewrite.output, None);
    }

    #[test]
    fn test_rewrite_source_parse_error() {
        let err = rewrite_source("package p\n\ntype T struct {\n", "json", Mode::Snake).unwrap_err();
        assert!(matches!(err, TaggerError::ParseError { .. }));
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.go");
        fs::write(&path, "old contents that are longer").unwrap();
        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("a.go");
        let err = write_atomic(&path, "x").unwrap_err();
        assert!(matches!(err, TaggerError::Write { .. }));
    }
}
