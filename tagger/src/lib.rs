//! jsontagger
//!
//! Normalizes the naming convention of one struct tag key (`json` by
//! default) across every struct declared in a Go source file:
//!  1) A tokenizer + parser that extracts struct declarations from Go source,
//!  2) A tag grammar that edits one key and keeps the rest of the tag intact,
//!  3) The per-field policy (create, append or rename the key),
//!  4) A printer that splices the new tags back and realigns the columns,
//!  5) File processing with atomic writes, and a JSON change report.

pub mod error;
pub mod utils;
pub mod types;
pub mod tokenizer;
pub mod parser;
pub mod tag;
pub mod policy;
pub mod rewrite;
pub mod walker;
pub mod layout;
pub mod printer;
pub mod config;
pub mod process;
pub mod report;

pub use config::{Config, Mode, DEFAULT_KEY};
pub use error::TaggerError;
pub use parser::parse_source;
pub use printer::print_source;
pub use process::{process_file, rewrite_source, Rewrite};
pub use report::Report;
pub use walker::{rewrite_tree, FieldChange};
