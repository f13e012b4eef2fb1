use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::TokenKind;

/// Precedence of the logical tier. `and` and `or` share it.
pub const LOGICAL_PRECEDENCE: u8 = 3;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Equal (`=`)
    #[serde(rename = "=")]
    Equal,
    /// Not equal (`!=`)
    #[serde(rename = "!=")]
    NotEqual,
    /// Less than (`<`)
    #[serde(rename = "<")]
    LessThan,
    /// Less than or equal (`<=`)
    #[serde(rename = "<=")]
    LessEqual,
    /// Greater than (`>`)
    #[serde(rename = ">")]
    GreaterThan,
    /// Greater than or equal (`>=`)
    #[serde(rename = ">=")]
    GreaterEqual,
    /// Membership (`in`)
    #[serde(rename = "in")]
    In,
    /// Non-membership (`!in`)
    #[serde(rename = "!in")]
    NotIn,
    /// Case-sensitive pattern match (`like`)
    #[serde(rename = "like")]
    Like,
    /// Negated `like` (`!like`)
    #[serde(rename = "!like")]
    NotLike,
    /// Case-insensitive pattern match (`ilike`)
    #[serde(rename = "ilike")]
    ILike,
    /// Negated `ilike` (`!ilike`)
    #[serde(rename = "!ilike")]
    NotILike,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 12] = [
        ComparisonOperator::Equal,
        ComparisonOperator::NotEqual,
        ComparisonOperator::LessThan,
        ComparisonOperator::LessEqual,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::GreaterEqual,
        ComparisonOperator::In,
        ComparisonOperator::NotIn,
        ComparisonOperator::Like,
        ComparisonOperator::NotLike,
        ComparisonOperator::ILike,
        ComparisonOperator::NotILike,
    ];

    pub fn from_token(kind: TokenKind) -> Option<Self> {
        use ComparisonOperator::*;
        Some(match kind {
            TokenKind::Eq => Equal,
            TokenKind::NotEq => NotEqual,
            TokenKind::Lt => LessThan,
            TokenKind::LtEq => LessEqual,
            TokenKind::Gt => GreaterThan,
            TokenKind::GtEq => GreaterEqual,
            TokenKind::In => In,
            TokenKind::NotIn => NotIn,
            TokenKind::Like => Like,
            TokenKind::NotLike => NotLike,
            TokenKind::ILike => ILike,
            TokenKind::NotILike => NotILike,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        use ComparisonOperator::*;
        match self {
            Equal => "=",
            NotEqual => "!=",
            LessThan => "<",
            LessEqual => "<=",
            GreaterThan => ">",
            GreaterEqual => ">=",
            In => "in",
            NotIn => "!in",
            Like => "like",
            NotLike => "!like",
            ILike => "ilike",
            NotILike => "!ilike",
        }
    }

    /// Word operators need whitespace around them when written out.
    pub fn is_word(self) -> bool {
        use ComparisonOperator::*;
        matches!(self, In | NotIn | Like | NotLike | ILike | NotILike)
    }

    /// `<`, `<=`, `>` and `>=`.
    pub fn is_ordering(self) -> bool {
        use ComparisonOperator::*;
        matches!(self, LessThan | LessEqual | GreaterThan | GreaterEqual)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical operators. `&&` and `||` are alternate spellings of `and` and `or`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[serde(rename = "and")]
    And,
    #[serde(rename = "or")]
    Or,
}

impl LogicalOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::And => Some(LogicalOperator::And),
            TokenKind::Or => Some(LogicalOperator::Or),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        LOGICAL_PRECEDENCE
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sign and negation prefixes.
///
/// `Positive`/`Negative` sign numeric and infinity literals; `Not` (spelled
/// `not` or `!`) negates an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolarityOperator {
    #[serde(rename = "+")]
    Positive,
    #[serde(rename = "-")]
    Negative,
    #[serde(rename = "not")]
    Not,
}

impl PolarityOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            PolarityOperator::Positive => "+",
            PolarityOperator::Negative => "-",
            PolarityOperator::Not => "not",
        }
    }
}

impl fmt::Display for PolarityOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
