//! Tree-to-tree transformations.
//!
//! A [`Fold`] reads a tree and builds a new one; the input is never touched,
//! so a parsed filter can be folded any number of times. Default methods
//! rebuild each node from its folded children, so an empty `impl Fold` is an
//! identity copy.

use std::collections::HashMap;

use crate::ast::{
    ArrayValue, ComparisonExpression, Expression, ExternalConstant, LogicalExpression,
    NegativeExpression, Operand, ParenthesizedExpression, QualifiedIdentifier, Span, Value,
};

pub trait Fold {
    fn fold_expression(&mut self, node: &Expression) -> Expression {
        match node {
            Expression::Comparison(node) => self.fold_comparison(node),
            Expression::Logical(node) => self.fold_logical(node),
            Expression::Parenthesized(node) => self.fold_parenthesized(node),
            Expression::Negative(node) => self.fold_negative(node),
        }
    }

    fn fold_comparison(&mut self, node: &ComparisonExpression) -> Expression {
        Expression::Comparison(ComparisonExpression {
            left: self.fold_qualified_identifier(&node.left),
            operator: node.operator,
            right: self.fold_operand(&node.right),
            span: self.fold_span(node.span),
        })
    }

    fn fold_logical(&mut self, node: &LogicalExpression) -> Expression {
        Expression::Logical(LogicalExpression {
            left: Box::new(self.fold_expression(&node.left)),
            operator: node.operator,
            right: Box::new(self.fold_expression(&node.right)),
            span: self.fold_span(node.span),
        })
    }

    fn fold_parenthesized(&mut self, node: &ParenthesizedExpression) -> Expression {
        Expression::Parenthesized(ParenthesizedExpression {
            inner: Box::new(self.fold_expression(&node.inner)),
            span: self.fold_span(node.span),
        })
    }

    fn fold_negative(&mut self, node: &NegativeExpression) -> Expression {
        Expression::Negative(NegativeExpression {
            operator: node.operator,
            inner: Box::new(self.fold_expression(&node.inner)),
            span: self.fold_span(node.span),
        })
    }

    fn fold_qualified_identifier(&mut self, node: &QualifiedIdentifier) -> QualifiedIdentifier {
        QualifiedIdentifier {
            segments: node.segments.clone(),
            span: self.fold_span(node.span),
        }
    }

    fn fold_operand(&mut self, node: &Operand) -> Operand {
        match node {
            Operand::Value(value) => Operand::Value(self.fold_value(value)),
            Operand::Identifier(ident) => Operand::Identifier(self.fold_qualified_identifier(ident)),
            Operand::Constant(constant) => self.fold_external_constant(constant),
            Operand::Array(array) => Operand::Array(self.fold_array(array)),
        }
    }

    fn fold_value(&mut self, node: &Value) -> Value {
        node.with_span(self.fold_span(node.span()))
    }

    /// Returns an operand so that a constant can be replaced by a value.
    fn fold_external_constant(&mut self, node: &ExternalConstant) -> Operand {
        Operand::Constant(ExternalConstant {
            name: node.name.clone(),
            span: self.fold_span(node.span),
        })
    }

    fn fold_array(&mut self, node: &ArrayValue) -> ArrayValue {
        ArrayValue {
            items: node.items.iter().map(|item| self.fold_value(item)).collect(),
            span: self.fold_span(node.span),
        }
    }

    fn fold_span(&mut self, span: Span) -> Span {
        span
    }
}

/// Drops spans and parenthesized wrappers, leaving only the grouping that
/// the tree shape itself encodes.
struct Normalizer;

impl Fold for Normalizer {
    fn fold_parenthesized(&mut self, node: &ParenthesizedExpression) -> Expression {
        self.fold_expression(&node.inner)
    }

    fn fold_span(&mut self, _span: Span) -> Span {
        Span::default()
    }
}

impl Expression {
    /// Copy of the tree without spans or [`ParenthesizedExpression`] nodes.
    pub fn normalize(&self) -> Expression {
        Normalizer.fold_expression(self)
    }

    /// Structural equality: same shape, operators and literals, ignoring
    /// source positions and redundant parentheses.
    ///
    /// ```
    /// use query_filter::parse;
    ///
    /// let a = parse("((a=1)) and b='x'").unwrap();
    /// let b = parse(r#"a = 1 && b = "x""#).unwrap();
    /// assert!(a.structurally_eq(&b));
    /// ```
    pub fn structurally_eq(&self, other: &Expression) -> bool {
        self.normalize() == other.normalize()
    }
}

/// Replaces `@name` constants with caller-supplied values.
///
/// Constants without a binding are left in place.
///
/// ```
/// use query_filter::{ast::Value, build, parse, transform::{ConstantBinder, Fold}};
///
/// let expr = parse("createdAt<@now and owner=@me").unwrap();
/// let bound = ConstantBinder::new()
///     .bind("now", Value::integer(1700000000))
///     .fold_expression(&expr);
/// assert_eq!(build(&bound), "createdAt<1700000000 and owner=@me");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConstantBinder {
    values: HashMap<String, Value>,
}

impl ConstantBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }
}

impl Fold for ConstantBinder {
    fn fold_external_constant(&mut self, node: &ExternalConstant) -> Operand {
        match self.values.get(&node.name) {
            Some(value) => Operand::Value(value.with_span(node.span)),
            None => Operand::Constant(node.clone()),
        }
    }
}
