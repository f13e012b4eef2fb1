use serde::{de, Deserialize, Deserializer, Serialize};

use crate::ast::{
    ArrayValue, ComparisonOperator, ExternalConstant, LogicalOperator, PolarityOperator,
    QualifiedIdentifier, Span, Value,
};
use crate::visitor::Visitor;

/// Abstract Syntax Tree node for a parsed filter.
///
/// Trees are immutable once built: transformations (see
/// [`crate::transform::Fold`]) always return a new tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Expression {
    /// `<path> <operator> <operand>`
    ///
    /// # Example
    /// ```text
    /// rate>=5
    /// address.countryCode="NL"
    /// ```
    #[serde(rename = "ComparisonExpression")]
    Comparison(ComparisonExpression),

    /// Two expressions joined by `and`/`or`
    #[serde(rename = "LogicalExpression")]
    Logical(LogicalExpression),

    /// An expression written inside `( )`
    #[serde(rename = "ParenthesizedExpression")]
    Parenthesized(ParenthesizedExpression),

    /// `not <expression>` or `!<expression>`
    #[serde(rename = "NegativeExpression")]
    Negative(NegativeExpression),
}

impl Expression {
    /// Builds a comparison without source positions.
    pub fn comparison(
        left: QualifiedIdentifier,
        operator: ComparisonOperator,
        right: impl Into<Operand>,
    ) -> Self {
        Expression::Comparison(ComparisonExpression {
            left,
            operator,
            right: right.into(),
            span: Span::default(),
        })
    }

    /// Builds a logical expression without source positions.
    pub fn logical(left: Expression, operator: LogicalOperator, right: Expression) -> Self {
        Expression::Logical(LogicalExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            span: Span::default(),
        })
    }

    pub fn parenthesized(inner: Expression) -> Self {
        Expression::Parenthesized(ParenthesizedExpression {
            inner: Box::new(inner),
            span: Span::default(),
        })
    }

    pub fn negate(inner: Expression) -> Self {
        Expression::Negative(NegativeExpression {
            operator: PolarityOperator::Not,
            inner: Box::new(inner),
            span: Span::default(),
        })
    }

    pub fn span(&self) -> Span {
        match self {
            Expression::Comparison(node) => node.span,
            Expression::Logical(node) => node.span,
            Expression::Parenthesized(node) => node.span,
            Expression::Negative(node) => node.span,
        }
    }

    /// Name of the node kind, as used in the JSON form.
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Comparison(_) => "ComparisonExpression",
            Expression::Logical(_) => "LogicalExpression",
            Expression::Parenthesized(_) => "ParenthesizedExpression",
            Expression::Negative(_) => "NegativeExpression",
        }
    }

    /// Walks the tree with `visitor`, starting at this node.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<V::Output, V::Error> {
        visitor.visit_expression(self)
    }

    /// Number of nodes in the tree, leaves included.
    pub fn node_count(&self) -> usize {
        match self {
            Expression::Comparison(node) => {
                let right = match &node.right {
                    Operand::Array(array) => 1 + array.items.len(),
                    _ => 1,
                };
                2 + right
            }
            Expression::Logical(node) => 1 + node.left.node_count() + node.right.node_count(),
            Expression::Parenthesized(node) => 1 + node.inner.node_count(),
            Expression::Negative(node) => 1 + node.inner.node_count(),
        }
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Value(Value),
    /// Field-to-field comparison
    Identifier(QualifiedIdentifier),
    Constant(ExternalConstant),
    Array(ArrayValue),
}

impl Operand {
    pub fn span(&self) -> Span {
        match self {
            Operand::Value(value) => value.span(),
            Operand::Identifier(ident) => ident.span,
            Operand::Constant(constant) => constant.span,
            Operand::Array(array) => array.span,
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<QualifiedIdentifier> for Operand {
    fn from(ident: QualifiedIdentifier) -> Self {
        Operand::Identifier(ident)
    }
}

impl From<ExternalConstant> for Operand {
    fn from(constant: ExternalConstant) -> Self {
        Operand::Constant(constant)
    }
}

impl From<ArrayValue> for Operand {
    fn from(array: ArrayValue) -> Self {
        Operand::Array(array)
    }
}

/// The left side is always a field path; literal-on-left is not part of the grammar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonExpression {
    pub left: QualifiedIdentifier,
    pub operator: ComparisonOperator,
    pub right: Operand,
    #[serde(skip)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalExpression {
    pub left: Box<Expression>,
    pub operator: LogicalOperator,
    pub right: Box<Expression>,
    #[serde(skip)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParenthesizedExpression {
    pub inner: Box<Expression>,
    #[serde(skip)]
    pub span: Span,
}

/// Negation. `operator` is always [`PolarityOperator::Not`]; deserializing
/// any other operator fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegativeExpression {
    #[serde(deserialize_with = "negation")]
    pub operator: PolarityOperator,
    pub inner: Box<Expression>,
    #[serde(skip)]
    pub span: Span,
}

fn negation<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PolarityOperator, D::Error> {
    match PolarityOperator::deserialize(deserializer)? {
        PolarityOperator::Not => Ok(PolarityOperator::Not),
        other => Err(de::Error::custom(format!(
            "a negation takes 'not', found '{}'",
            other.as_str()
        ))),
    }
}
