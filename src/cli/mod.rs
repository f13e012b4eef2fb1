//! CLI support for query-filter
//!
//! Provides programmatic access to the `qfilter` command functionality so it
//! can be embedded in other tools or tested without spawning a process.

mod check;
mod convert;
mod docs;

pub use check::{execute_check, CheckOptions, CheckResult, Mode};
pub use convert::{filter_to_json, json_to_filter};
pub use docs::{get_doc_category, get_docs_overview, DocCategory};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// The filter did not parse
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),
    /// The filter parsed but failed schema validation
    #[error("Validation error: {0}")]
    Validation(#[from] crate::ValidationError),
    /// The schema document is not valid JSON for a schema
    #[error("Invalid schema: {0}")]
    Schema(#[source] serde_json::Error),
    /// JSON conversion error
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// No filter provided
    #[error("No filter provided. Pass it as an argument or pipe it to stdin.")]
    NoInput,
    /// Validation requested without a schema
    #[error("No schema provided. Use --schema or pipe JSON to stdin.")]
    NoSchema,
    /// Unknown documentation category
    #[error("Unknown category: '{0}'\nRun 'qfilter docs' to see available categories.")]
    UnknownCategory(String),
}
