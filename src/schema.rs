//! Schema boundary: what the validator needs to know about fields.
//!
//! The filter core never decides on its own whether a field exists or which
//! operators it accepts. It asks a [`FieldResolver`], implemented by the
//! resource model that owns the data. [`StaticSchema`] is a plain in-memory
//! resolver for tools and tests.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ast::{ComparisonOperator, QualifiedIdentifier};

/// Maps a field path to its descriptor.
pub trait FieldResolver {
    /// `None` means the path does not name a field.
    fn resolve(&self, path: &QualifiedIdentifier) -> Option<FieldDescriptor>;
}

impl<R: FieldResolver + ?Sized> FieldResolver for &R {
    fn resolve(&self, path: &QualifiedIdentifier) -> Option<FieldDescriptor> {
        (**self).resolve(path)
    }
}

/// Underlying data type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Integer,
    Number,
    Boolean,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Time,
    Object,
}

impl DataType {
    /// Operators a field of this type accepts unless configured otherwise.
    pub fn default_operators(self) -> HashSet<ComparisonOperator> {
        use ComparisonOperator::*;
        let operators: &[ComparisonOperator] = match self {
            DataType::String => &ComparisonOperator::ALL,
            DataType::Integer
            | DataType::Number
            | DataType::Date
            | DataType::DateTime
            | DataType::Time => &[
                Equal,
                NotEqual,
                LessThan,
                LessEqual,
                GreaterThan,
                GreaterEqual,
                In,
                NotIn,
            ],
            DataType::Boolean => &[Equal, NotEqual, In, NotIn],
            DataType::Object => &[Equal, NotEqual],
        };
        operators.iter().copied().collect()
    }
}

/// What the validator knows about a resolved field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub data_type: DataType,
    /// Multi-valued field. Array fields have no order, so their default
    /// operators leave out `<`, `<=`, `>` and `>=`.
    #[serde(default, rename = "array")]
    pub is_array: bool,
    #[serde(default = "default_filterable")]
    pub filterable: bool,
    /// Accepted operators. Deserializing without this key uses the type's defaults.
    #[serde(default)]
    pub operators: Option<HashSet<ComparisonOperator>>,
}

fn default_filterable() -> bool {
    true
}

impl FieldDescriptor {
    /// A filterable scalar field accepting the type's default operators.
    pub fn new(data_type: DataType) -> Self {
        FieldDescriptor {
            data_type,
            is_array: false,
            filterable: true,
            operators: None,
        }
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn not_filterable(mut self) -> Self {
        self.filterable = false;
        self
    }

    pub fn with_operators<I>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = ComparisonOperator>,
    {
        self.operators = Some(operators.into_iter().collect());
        self
    }

    /// The operators this field accepts, defaults included.
    pub fn accepted_operators(&self) -> HashSet<ComparisonOperator> {
        match &self.operators {
            Some(operators) => operators.clone(),
            None => self
                .data_type
                .default_operators()
                .into_iter()
                .filter(|op| !(self.is_array && op.is_ordering()))
                .collect(),
        }
    }

    pub fn accepts(&self, operator: ComparisonOperator) -> bool {
        match &self.operators {
            Some(operators) => operators.contains(&operator),
            None => {
                !(self.is_array && operator.is_ordering())
                    && self.data_type.default_operators().contains(&operator)
            }
        }
    }
}

/// In-memory resolver keyed by dotted path.
///
/// # JSON form
///
/// ```json
/// {
///   "fields": {
///     "givenName": { "type": "string" },
///     "rate": { "type": "number", "filterable": false },
///     "gender": { "type": "string", "operators": ["=", "!="] },
///     "tags": { "type": "string", "array": true }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticSchema {
    fields: HashMap<String, FieldDescriptor>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the field at `path` (dotted form).
    pub fn field(mut self, path: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(path.into(), descriptor);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldResolver for StaticSchema {
    fn resolve(&self, path: &QualifiedIdentifier) -> Option<FieldDescriptor> {
        self.fields.get(&path.path()).cloned()
    }
}
