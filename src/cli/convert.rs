//! Filter AST <-> JSON conversion utilities

use crate::ast::Expression;

/// Convert a filter AST to its `kind`-tagged JSON form
pub fn filter_to_json(expr: &Expression) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(expr)
}

/// Convert `kind`-tagged JSON back into a filter AST
///
/// Source positions are not part of the JSON form, so every span of the
/// returned tree is the default span. Trees the parser could never produce,
/// such as an empty path or an empty array, are rejected.
pub fn json_to_filter(v: serde_json::Value) -> Result<Expression, serde_json::Error> {
    serde_json::from_value(v)
}
