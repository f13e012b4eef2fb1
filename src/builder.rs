//! Canonical text output for filter ASTs.
//!
//! The builder is the right inverse of the parser: re-parsing its output
//! yields a tree structurally equal to the one printed (see
//! [`Expression::structurally_eq`]). Exact source text is not preserved.
//!
//! # Canonical Form
//!
//! - Symbolic comparison operators are written tight (`rate>=5`); word
//!   operators get single spaces (`status in [1,2,3]`)
//! - Logical operators are written as ` and ` / ` or `, negation as `not `
//! - Strings are single-quoted, with `'` doubled inside
//! - Parentheses from the source are dropped and only re-inserted where the
//!   grouping would otherwise change
//!
//! # Examples
//!
//! ```
//! use query_filter::{build, parse};
//!
//! let expr = parse(r#"( givenName = "John" ) && rate >= 5"#).unwrap();
//! assert_eq!(build(&expr), "givenName='John' and rate>=5");
//! ```

use std::fmt;

use crate::ast::{
    ArrayValue, ComparisonExpression, Expression, Operand, PolarityOperator, QualifiedIdentifier,
    Value,
};

pub struct Builder {
    spaced: bool,
}

impl Builder {
    /// `spaced` puts spaces around every comparison operator and after array commas.
    pub fn new(spaced: bool) -> Self {
        Builder { spaced }
    }

    pub fn print(&self, expr: &Expression) -> String {
        self.print_expression(unwrap_parens(expr))
    }

    fn print_expression(&self, expr: &Expression) -> String {
        match expr {
            Expression::Comparison(node) => self.print_comparison(node),
            Expression::Logical(node) => {
                let left = self.print_expression(unwrap_parens(&node.left));
                let right = self.print_grouped(&node.right);
                format!("{} {} {}", left, node.operator, right)
            }
            Expression::Parenthesized(node) => self.print_expression(unwrap_parens(&node.inner)),
            Expression::Negative(node) => format!("not {}", self.print_grouped(&node.inner)),
        }
    }

    /// Prints `expr` in a position where a logical chain must be parenthesized.
    fn print_grouped(&self, expr: &Expression) -> String {
        let expr = unwrap_parens(expr);
        match expr {
            Expression::Logical(_) => format!("({})", self.print_expression(expr)),
            _ => self.print_expression(expr),
        }
    }

    fn print_comparison(&self, node: &ComparisonExpression) -> String {
        let left = print_identifier(&node.left);
        let right = self.print_operand(&node.right);
        if self.spaced || node.operator.is_word() {
            format!("{} {} {}", left, node.operator, right)
        } else {
            format!("{}{}{}", left, node.operator, right)
        }
    }

    fn print_operand(&self, operand: &Operand) -> String {
        match operand {
            Operand::Value(value) => print_value(value),
            Operand::Identifier(ident) => print_identifier(ident),
            Operand::Constant(constant) => format!("@{}", constant.name),
            Operand::Array(array) => self.print_array(array),
        }
    }

    fn print_array(&self, array: &ArrayValue) -> String {
        let separator = if self.spaced { ", " } else { "," };
        let items: Vec<String> = array.items.iter().map(print_value).collect();
        format!("[{}]", items.join(separator))
    }
}

fn unwrap_parens(mut expr: &Expression) -> &Expression {
    while let Expression::Parenthesized(node) = expr {
        expr = &node.inner;
    }
    expr
}

fn print_identifier(ident: &QualifiedIdentifier) -> String {
    ident.path()
}

fn print_value(value: &Value) -> String {
    match value {
        Value::Integer { value, .. } => value.to_string(),
        Value::Number { value, .. } => {
            // Keep a fraction so the literal re-parses as a number, not an integer.
            let value = value.normalize();
            if value.scale() == 0 {
                format!("{value}.0")
            } else {
                value.to_string()
            }
        }
        Value::String { value, .. } => format!("'{}'", value.replace('\'', "''")),
        Value::Boolean { value, .. } => value.to_string(),
        Value::Null { .. } => "null".to_string(),
        Value::Date { value, .. } | Value::DateTime { value, .. } | Value::Time { value, .. } => {
            value.clone()
        }
        Value::Infinity { polarity, .. } => match polarity {
            Some(PolarityOperator::Positive) => "+Infinity".to_string(),
            Some(PolarityOperator::Negative) => "-Infinity".to_string(),
            _ => "Infinity".to_string(),
        },
    }
}

/// Renders `expr` in canonical form.
pub fn build(expr: &Expression) -> String {
    Builder::new(false).print(expr)
}

/// Renders `expr` with spaces around every operator, for display.
///
/// ```
/// use query_filter::{builder::build_spaced, parse};
///
/// let expr = parse("status in [1,2] and rate>=5").unwrap();
/// assert_eq!(build_spaced(&expr), "status in [1, 2] and rate >= 5");
/// ```
pub fn build_spaced(expr: &Expression) -> String {
    Builder::new(true).print(expr)
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build(self))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_value(self))
    }
}

impl fmt::Display for QualifiedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_identifier(self))
    }
}
