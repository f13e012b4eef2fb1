use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::ast::{PolarityOperator, Span, TokenKind};
use crate::lexer;

/// Literal value on the right-hand side of a comparison or inside an array.
///
/// Date, datetime and time literals keep their source text: they are
/// recognized by shape only and never interpreted as calendar values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Value {
    /// Numeral with a fraction or exponent, or an integer too large for `i64`
    ///
    /// # Example
    /// ```text
    /// 1.5
    /// -2e3
    /// ```
    #[serde(rename = "NumberLiteral")]
    Number {
        value: Decimal,
        #[serde(skip)]
        span: Span,
    },

    /// Numeral without fraction or exponent
    ///
    /// # Example
    /// ```text
    /// 42
    /// -1
    /// ```
    #[serde(rename = "IntegerLiteral")]
    Integer {
        value: i64,
        #[serde(skip)]
        span: Span,
    },

    /// Quoted text, already unescaped
    #[serde(rename = "StringLiteral")]
    String {
        value: String,
        #[serde(skip)]
        span: Span,
    },

    /// `true` or `false`
    #[serde(rename = "BooleanLiteral")]
    Boolean {
        value: bool,
        #[serde(skip)]
        span: Span,
    },

    /// `null`
    #[serde(rename = "NullLiteral")]
    Null {
        #[serde(skip)]
        span: Span,
    },

    /// `YYYY-MM-DD`
    #[serde(rename = "DateLiteral")]
    Date {
        #[serde(deserialize_with = "date_text")]
        value: String,
        #[serde(skip)]
        span: Span,
    },

    /// `YYYY-MM-DDTHH:MM:SS...`
    #[serde(rename = "DateTimeLiteral")]
    DateTime {
        #[serde(deserialize_with = "datetime_text")]
        value: String,
        #[serde(skip)]
        span: Span,
    },

    /// `HH:MM[:SS]`
    #[serde(rename = "TimeLiteral")]
    Time {
        #[serde(deserialize_with = "time_text")]
        value: String,
        #[serde(skip)]
        span: Span,
    },

    /// `Infinity`, `+Infinity` or `-infinity`
    #[serde(rename = "InfinityLiteral")]
    Infinity {
        #[serde(default, deserialize_with = "sign")]
        polarity: Option<PolarityOperator>,
        #[serde(skip)]
        span: Span,
    },
}

impl Value {
    pub fn integer(value: i64) -> Self {
        Value::Integer {
            value,
            span: Span::default(),
        }
    }

    pub fn number(value: Decimal) -> Self {
        Value::Number {
            value,
            span: Span::default(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Value::String {
            value: value.into(),
            span: Span::default(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Value::Boolean {
            value,
            span: Span::default(),
        }
    }

    pub fn null() -> Self {
        Value::Null {
            span: Span::default(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Value::Number { span, .. }
            | Value::Integer { span, .. }
            | Value::String { span, .. }
            | Value::Boolean { span, .. }
            | Value::Null { span }
            | Value::Date { span, .. }
            | Value::DateTime { span, .. }
            | Value::Time { span, .. }
            | Value::Infinity { span, .. } => *span,
        }
    }

    /// Same literal with its span replaced.
    pub fn with_span(&self, span: Span) -> Self {
        let mut value = self.clone();
        match &mut value {
            Value::Number { span: s, .. }
            | Value::Integer { span: s, .. }
            | Value::String { span: s, .. }
            | Value::Boolean { span: s, .. }
            | Value::Null { span: s }
            | Value::Date { span: s, .. }
            | Value::DateTime { span: s, .. }
            | Value::Time { span: s, .. }
            | Value::Infinity { span: s, .. } => *s = span,
        }
        value
    }

    /// Name of the literal kind, as used in the JSON form.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number { .. } => "NumberLiteral",
            Value::Integer { .. } => "IntegerLiteral",
            Value::String { .. } => "StringLiteral",
            Value::Boolean { .. } => "BooleanLiteral",
            Value::Null { .. } => "NullLiteral",
            Value::Date { .. } => "DateLiteral",
            Value::DateTime { .. } => "DateTimeLiteral",
            Value::Time { .. } => "TimeLiteral",
            Value::Infinity { .. } => "InfinityLiteral",
        }
    }
}

/// Dot-separated field path such as `address.countryCode`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub struct QualifiedIdentifier {
    #[serde(deserialize_with = "path_segments")]
    pub segments: Vec<String>,
    #[serde(skip)]
    pub span: Span,
}

impl QualifiedIdentifier {
    /// Builds a path from its segments.
    ///
    /// ```
    /// use query_filter::ast::QualifiedIdentifier;
    ///
    /// let path = QualifiedIdentifier::new(["address", "countryCode"]);
    /// assert_eq!(path.path(), "address.countryCode");
    /// ```
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QualifiedIdentifier {
            segments: segments.into_iter().map(Into::into).collect(),
            span: Span::default(),
        }
    }

    /// The dotted form of the path.
    pub fn path(&self) -> String {
        self.segments.join(".")
    }
}

/// `@name` placeholder resolved by the caller, e.g. `@now`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub struct ExternalConstant {
    #[serde(deserialize_with = "constant_name")]
    pub name: String,
    #[serde(skip)]
    pub span: Span,
}

impl ExternalConstant {
    pub fn new(name: impl Into<String>) -> Self {
        ExternalConstant {
            name: name.into(),
            span: Span::default(),
        }
    }
}

/// `[v1, v2, ...]`. Always has at least one item; item types may differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub struct ArrayValue {
    #[serde(deserialize_with = "array_items")]
    pub items: Vec<Value>,
    #[serde(skip)]
    pub span: Span,
}

impl ArrayValue {
    pub fn new(items: Vec<Value>) -> Self {
        ArrayValue {
            items,
            span: Span::default(),
        }
    }
}

// Deserialized trees hold the same guarantees as parsed ones, so anything the
// builder prints parses back.

fn path_segments<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let segments = Vec::<String>::deserialize(deserializer)?;
    if segments.is_empty() {
        return Err(de::Error::custom("a field path needs at least one segment"));
    }
    if let Some(segment) = segments.iter().find(|s| !lexer::is_identifier(s)) {
        return Err(de::Error::custom(format!("'{segment}' is not a valid path segment")));
    }
    Ok(segments)
}

fn constant_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let name = String::deserialize(deserializer)?;
    if !lexer::is_identifier(&name) {
        return Err(de::Error::custom(format!("'{name}' is not a valid constant name")));
    }
    Ok(name)
}

fn array_items<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    let items = Vec::<Value>::deserialize(deserializer)?;
    if items.is_empty() {
        return Err(de::Error::custom("an array needs at least one item"));
    }
    Ok(items)
}

fn sign<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PolarityOperator>, D::Error> {
    match Option::<PolarityOperator>::deserialize(deserializer)? {
        Some(PolarityOperator::Not) => {
            Err(de::Error::custom("Infinity takes '+' or '-', not 'not'"))
        }
        polarity => Ok(polarity),
    }
}

fn literal_text<'de, D: Deserializer<'de>>(
    deserializer: D,
    kind: TokenKind,
) -> Result<String, D::Error> {
    let text = String::deserialize(deserializer)?;
    if !lexer::is_literal(&text, kind) {
        return Err(de::Error::custom(format!(
            "'{text}' is not a {} literal",
            kind.describe()
        )));
    }
    Ok(text)
}

fn date_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    literal_text(deserializer, TokenKind::Date)
}

fn datetime_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    literal_text(deserializer, TokenKind::DateTime)
}

fn time_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    literal_text(deserializer, TokenKind::Time)
}
