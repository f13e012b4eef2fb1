//! Read-only traversal of filter ASTs.
//!
//! Implement [`Visitor`] and override the methods for the node kinds you care
//! about; the defaults recurse into children through the `walk_*` functions,
//! left to right and depth first. Returning an error from any method stops
//! the walk, so the first violation found is the one reported.
//!
//! # Example
//!
//! ```
//! use query_filter::{ast::QualifiedIdentifier, parse, visitor::Visitor};
//! use std::convert::Infallible;
//!
//! #[derive(Default)]
//! struct Paths(Vec<String>);
//!
//! impl Visitor for Paths {
//!     type Output = ();
//!     type Error = Infallible;
//!
//!     fn visit_qualified_identifier(&mut self, node: &QualifiedIdentifier) -> Result<(), Infallible> {
//!         self.0.push(node.path());
//!         Ok(())
//!     }
//! }
//!
//! let expr = parse("a.b=1 or c=d").unwrap();
//! let mut paths = Paths::default();
//! expr.accept(&mut paths).unwrap();
//! assert_eq!(paths.0, ["a.b", "c", "d"]);
//! ```

use crate::ast::{
    ArrayValue, ComparisonExpression, Expression, ExternalConstant, LogicalExpression,
    NegativeExpression, Operand, ParenthesizedExpression, QualifiedIdentifier, Value,
};

/// One method per node kind. Composite nodes return the output of the last
/// child visited; leaves return `Output::default()`.
pub trait Visitor {
    type Output: Default;
    type Error;

    fn visit_expression(&mut self, node: &Expression) -> Result<Self::Output, Self::Error> {
        walk_expression(self, node)
    }

    fn visit_comparison(
        &mut self,
        node: &ComparisonExpression,
    ) -> Result<Self::Output, Self::Error> {
        walk_comparison(self, node)
    }

    fn visit_logical(&mut self, node: &LogicalExpression) -> Result<Self::Output, Self::Error> {
        walk_logical(self, node)
    }

    fn visit_parenthesized(
        &mut self,
        node: &ParenthesizedExpression,
    ) -> Result<Self::Output, Self::Error> {
        walk_parenthesized(self, node)
    }

    fn visit_negative(&mut self, node: &NegativeExpression) -> Result<Self::Output, Self::Error> {
        walk_negative(self, node)
    }

    fn visit_qualified_identifier(
        &mut self,
        _node: &QualifiedIdentifier,
    ) -> Result<Self::Output, Self::Error> {
        Ok(Self::Output::default())
    }

    fn visit_operand(&mut self, node: &Operand) -> Result<Self::Output, Self::Error> {
        walk_operand(self, node)
    }

    fn visit_value(&mut self, _node: &Value) -> Result<Self::Output, Self::Error> {
        Ok(Self::Output::default())
    }

    fn visit_external_constant(
        &mut self,
        _node: &ExternalConstant,
    ) -> Result<Self::Output, Self::Error> {
        Ok(Self::Output::default())
    }

    fn visit_array(&mut self, node: &ArrayValue) -> Result<Self::Output, Self::Error> {
        walk_array(self, node)
    }
}

/// Dispatches on the node kind.
pub fn walk_expression<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &Expression,
) -> Result<V::Output, V::Error> {
    match node {
        Expression::Comparison(node) => visitor.visit_comparison(node),
        Expression::Logical(node) => visitor.visit_logical(node),
        Expression::Parenthesized(node) => visitor.visit_parenthesized(node),
        Expression::Negative(node) => visitor.visit_negative(node),
    }
}

pub fn walk_comparison<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &ComparisonExpression,
) -> Result<V::Output, V::Error> {
    visitor.visit_qualified_identifier(&node.left)?;
    visitor.visit_operand(&node.right)
}

pub fn walk_logical<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &LogicalExpression,
) -> Result<V::Output, V::Error> {
    visitor.visit_expression(&node.left)?;
    visitor.visit_expression(&node.right)
}

pub fn walk_parenthesized<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &ParenthesizedExpression,
) -> Result<V::Output, V::Error> {
    visitor.visit_expression(&node.inner)
}

pub fn walk_negative<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &NegativeExpression,
) -> Result<V::Output, V::Error> {
    visitor.visit_expression(&node.inner)
}

pub fn walk_operand<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &Operand,
) -> Result<V::Output, V::Error> {
    match node {
        Operand::Value(value) => visitor.visit_value(value),
        Operand::Identifier(ident) => visitor.visit_qualified_identifier(ident),
        Operand::Constant(constant) => visitor.visit_external_constant(constant),
        Operand::Array(array) => visitor.visit_array(array),
    }
}

pub fn walk_array<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &ArrayValue,
) -> Result<V::Output, V::Error> {
    let mut output = V::Output::default();
    for item in &node.items {
        output = visitor.visit_value(item)?;
    }
    Ok(output)
}
