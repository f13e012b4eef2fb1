//! Parse, format, dump and validate filters

use super::{filter_to_json, CliError};
use crate::{builder, parse_with_options, schema::StaticSchema, validate, ParseOptions};

/// What to do with the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Only check that the filter parses
    #[default]
    Check,
    /// Print the canonical form
    Format,
    /// Print the JSON AST
    Ast,
    /// Parse and validate against a schema
    Validate,
}

/// Options for the check command family
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter text
    pub filter: String,
    pub mode: Mode,
    /// Schema JSON, required by [`Mode::Validate`]
    pub schema: Option<String>,
    /// Format with spaces around every operator
    pub spaced: bool,
    pub parse: ParseOptions,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Filter parsed
    SyntaxValid,
    /// Canonical text
    Formatted(String),
    /// `kind`-tagged AST
    Ast(serde_json::Value),
    /// Filter parsed and every field and operator was accepted
    SchemaValid,
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let filter = options.filter.trim();
    if filter.is_empty() {
        return Err(CliError::NoInput);
    }

    let expr = parse_with_options(filter, &options.parse)?;

    match options.mode {
        Mode::Check => Ok(CheckResult::SyntaxValid),
        Mode::Format => {
            let text = if options.spaced {
                builder::build_spaced(&expr)
            } else {
                builder::build(&expr)
            };
            Ok(CheckResult::Formatted(text))
        }
        Mode::Ast => Ok(CheckResult::Ast(filter_to_json(&expr)?)),
        Mode::Validate => {
            let schema_json = options.schema.as_ref().ok_or(CliError::NoSchema)?;
            let schema = StaticSchema::from_json(schema_json).map_err(CliError::Schema)?;
            validate(&expr, &schema)?;
            Ok(CheckResult::SchemaValid)
        }
    }
}
