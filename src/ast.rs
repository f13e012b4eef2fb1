//! # Filter Language - Abstract Syntax Tree
//!
//! This module defines the tokens and the Abstract Syntax Tree (AST) of the
//! filter language: predicate expressions embedded in URL query strings, in
//! the spirit of OData's `$filter`.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens, source positions and spans
//! - **[operators]** - Comparison, logical and polarity operators
//! - **[values]** - Literals, field paths, external constants and arrays
//! - **[expressions]** - Comparison, logical, parenthesized and negated expressions
//!
//! ## Quick Start
//!
//! ```text
//! givenName="John" and rate>=5
//! ```
//!
//! This filter keeps records whose `givenName` is `John` and whose `rate` is
//! at least 5.
//!
//! ## Core Concepts
//!
//! ### Comparisons
//!
//! A comparison always has a field path on the left:
//!
//! ```text
//! <path> <operator> <value | path | @constant | [array]>
//! ```
//!
//! ### Logical Chains
//!
//! `and`, `or`, `&&` and `||` share one precedence tier and associate to the
//! left, so `a=1 or b=2 and c=3` groups as `(a=1 or b=2) and c=3`. Use
//! parentheses to group differently.
//!
//! ### Negation
//!
//! `not` and `!` bind tighter than logical operators and apply to the
//! expression immediately following them.
//!
//! ### Positions
//!
//! Every node carries a [`Span`]. Spans are ignored by
//! [`Expression::structurally_eq`] and are not part of the JSON form.
//!
//! ## Examples
//!
//! ### Dot Paths
//!
//! ```text
//! address.countryCode="NL"
//! ```
//!
//! ### Array Membership
//!
//! ```text
//! status in [1,2,3]
//! ```
//!
//! ### External Constants
//!
//! ```text
//! createdAt<@now
//! ```
//!
//! ### Signed Literals
//!
//! ```text
//! balance>-1.5 and limit<+Infinity
//! ```
pub mod tokens;
pub mod operators;
pub mod values;
pub mod expressions;

pub use tokens::{Position, Span, Token, TokenKind};
pub use operators::{ComparisonOperator, LogicalOperator, PolarityOperator, LOGICAL_PRECEDENCE};
pub use values::{ArrayValue, ExternalConstant, QualifiedIdentifier, Value};
pub use expressions::{
    ComparisonExpression, Expression, LogicalExpression, NegativeExpression, Operand,
    ParenthesizedExpression,
};
