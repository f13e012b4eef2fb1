//! Schema-aware validation of parsed filters.
//!
//! Validation is a separate pass after parsing: a filter that parses can
//! still reference unknown fields or use operators a field does not accept.
//! The walk is left to right, depth first, and stops at the first violation.
//!
//! # Usage
//!
//! ```
//! use query_filter::{parse, validate};
//! use query_filter::schema::{DataType, FieldDescriptor, StaticSchema};
//!
//! let schema = StaticSchema::new().field("rate", FieldDescriptor::new(DataType::Number));
//!
//! assert!(validate(&parse("rate>=1").unwrap(), &schema).is_ok());
//!
//! let err = validate(&parse("rating>=1").unwrap(), &schema).unwrap_err();
//! assert_eq!(err.code(), "UNKNOWN_FIELD");
//! ```

use thiserror::Error;
use tracing::{debug, debug_span, field};

use crate::{
    ast::{ComparisonExpression, ComparisonOperator, Expression, Operand, QualifiedIdentifier, Span},
    schema::{DataType, FieldDescriptor, FieldResolver},
    visitor::Visitor,
};

/// Semantic errors. [`ValidationError::code`] gives the wire code callers report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The path does not resolve to a field
    #[error("UNKNOWN_FIELD: field '{path}' does not exist (at {})", .span.start)]
    UnknownField { path: String, span: Span },

    /// The field exists but cannot be filtered on
    #[error("UNACCEPTED_FILTER_FIELD: field '{path}' cannot be used in a filter (at {})", .span.start)]
    UnacceptedFilterField { path: String, span: Span },

    /// The field does not accept the operator
    #[error(
        "UNACCEPTED_FILTER_OPERATION: operator '{operator}' is not accepted for field '{path}' (at {})",
        .span.start
    )]
    UnacceptedFilterOperation {
        path: String,
        operator: ComparisonOperator,
        data_type: DataType,
        span: Span,
    },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::UnknownField { .. } => "UNKNOWN_FIELD",
            ValidationError::UnacceptedFilterField { .. } => "UNACCEPTED_FILTER_FIELD",
            ValidationError::UnacceptedFilterOperation { .. } => "UNACCEPTED_FILTER_OPERATION",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ValidationError::UnknownField { path, .. }
            | ValidationError::UnacceptedFilterField { path, .. }
            | ValidationError::UnacceptedFilterOperation { path, .. } => path,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ValidationError::UnknownField { span, .. }
            | ValidationError::UnacceptedFilterField { span, .. }
            | ValidationError::UnacceptedFilterOperation { span, .. } => *span,
        }
    }
}

/// Visitor that checks every comparison against a [`FieldResolver`].
pub struct Validator<'a, R: FieldResolver + ?Sized> {
    resolver: &'a R,
    comparisons_checked: usize,
}

impl<'a, R: FieldResolver + ?Sized> Validator<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        Validator {
            resolver,
            comparisons_checked: 0,
        }
    }

    /// Comparisons that passed so far.
    pub fn comparisons_checked(&self) -> usize {
        self.comparisons_checked
    }

    fn resolve_filterable(
        &self,
        path: &QualifiedIdentifier,
    ) -> Result<FieldDescriptor, ValidationError> {
        let Some(field) = self.resolver.resolve(path) else {
            debug!(target: "query_filter", path = %path, "unknown filter field");
            return Err(ValidationError::UnknownField {
                path: path.path(),
                span: path.span,
            });
        };

        if !field.filterable {
            debug!(target: "query_filter", path = %path, "field is not filterable");
            return Err(ValidationError::UnacceptedFilterField {
                path: path.path(),
                span: path.span,
            });
        }
        Ok(field)
    }
}

impl<R: FieldResolver + ?Sized> Visitor for Validator<'_, R> {
    type Output = ();
    type Error = ValidationError;

    fn visit_comparison(&mut self, node: &ComparisonExpression) -> Result<(), ValidationError> {
        let field = self.resolve_filterable(&node.left)?;

        if !field.accepts(node.operator) {
            debug!(
                target: "query_filter",
                path = %node.left,
                operator = %node.operator,
                data_type = ?field.data_type,
                "operator not accepted for field"
            );
            return Err(ValidationError::UnacceptedFilterOperation {
                path: node.left.path(),
                operator: node.operator,
                data_type: field.data_type,
                span: node.span,
            });
        }

        // Field-to-field comparisons need the right-hand field to be filterable too.
        if let Operand::Identifier(other) = &node.right {
            self.resolve_filterable(other)?;
        }

        self.comparisons_checked += 1;
        Ok(())
    }
}

/// Validates `expr` against `resolver`, reporting the first violation.
pub fn validate<R: FieldResolver + ?Sized>(
    expr: &Expression,
    resolver: &R,
) -> Result<(), ValidationError> {
    let span = debug_span!(
        target: "query_filter",
        "validate",
        comparisons_checked = field::Empty,
    );
    let _guard = span.enter();

    let mut validator = Validator::new(resolver);
    let result = expr.accept(&mut validator);
    span.record("comparisons_checked", validator.comparisons_checked() as u64);
    result
}
