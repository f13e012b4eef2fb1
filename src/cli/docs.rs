//! Documentation content for qfilter CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Literals,
    Validation,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" | "grammar" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "literals" | "literal" | "values" => Some(Self::Literals),
            "validation" | "schema" | "errors" => Some(Self::Validation),
            _ => None,
        }
    }

    fn content(self) -> &'static str {
        match self {
            Self::Syntax => SYNTAX,
            Self::Operators => OPERATORS,
            Self::Literals => LITERALS,
            Self::Validation => VALIDATION,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"QUERY FILTER DOCUMENTATION

A filter is a predicate over the fields of a resource, written in a URL query
string value such as $filter=givenName="John" and rate>=5. Filters compare
field paths with values and combine comparisons with logical operators.

DOCUMENTATION CATEGORIES

  syntax            Comparisons, paths, grouping, negation, precedence
  operators         Comparison and logical operators
  literals          Numbers, strings, dates, arrays, constants
  validation        Schema checks and error codes

QUICK REFERENCE

  rate>=5                       Comparison
  address.countryCode="NL"      Dot path
  status in [1,2,3]             Array membership
  createdAt<@now                External constant
  a=1 and (b=2 or c=3)          Grouping
  not a=1                       Negation (also !a=1)

COMMANDS

  qfilter check <filter>        Check that a filter parses
  qfilter fmt <filter>          Print the canonical form
  qfilter ast <filter>          Print the JSON syntax tree
  qfilter validate <filter>     Validate against a schema (--schema)
  qfilter doc <category>        Show a documentation category
"#
}

/// Get documentation content for a category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    DocCategory::from_name(name)
        .map(DocCategory::content)
        .ok_or_else(|| CliError::UnknownCategory(name.to_string()))
}

const SYNTAX: &str = r#"SYNTAX

COMPARISONS
  <path> <operator> <operand>

  The left side is always a field path. The right side is one of:
    a literal           rate>=5
    another field       updatedAt>createdAt
    a constant          createdAt<@now
    an array            status in [1,2,3]

  Literals on the left are not allowed: 5<=rate is a syntax error.

PATHS
  identifier ('.' identifier)*

  Identifiers are [A-Za-z_][A-Za-z0-9_]*. Reserved words (and, or, not,
  true, false, null, in, like, ilike, Infinity, infinity) cannot be used
  as identifiers.

    address.countryCode="NL"
    _id<10

LOGICAL OPERATORS
  and, or, &&, ||

  All four share one precedence level and associate to the left:

    a=1 or b=2 and c=3      means   (a=1 or b=2) and c=3

  Use parentheses to group differently:

    a=1 or (b=2 and c=3)

NEGATION
  not <expression>
  !<expression>

  Negation binds tighter than and/or and applies to the expression right
  after it:

    not a=1 and b=2         means   (not a=1) and b=2
    not (a=1 and b=2)       negates the whole group

WHITESPACE
  Whitespace between tokens is ignored. Word operators (in, like, and, ...)
  need whitespace or punctuation around them.

ERRORS
  A filter that does not parse is rejected as a whole, with the line and
  column of the first offending token:

    qfilter check 'rate>='
    Parse error: expected one of [value, identifier, '@', '['], found end of input at 1:7
"#;

const OPERATORS: &str = r#"OPERATORS

COMPARISON
  =         Equal                       givenName="John"
  !=        Not equal                   status!=0
  <         Less than                   rate<5
  <=        Less than or equal          rate<=5
  >         Greater than                rate>5
  >=        Greater than or equal       rate>=5
  in        Member of array             status in [1,2,3]
  !in       Not a member of array       status !in [4,5]
  like      Pattern match               name like "Jo%"
  !like     Negated pattern match       name !like "Jo%"
  ilike     Case-insensitive match      name ilike "jo%"
  !ilike    Negated case-insensitive    name !ilike "jo%"

  Which operators a field accepts depends on its schema type; see
  'qfilter doc validation'.

LOGICAL
  and, &&   Both sides hold
  or, ||    Either side holds
  not, !    Negation

SIGNS
  + and - directly before a number or Infinity sign the literal:

    balance>-1.5
    limit<+Infinity
"#;

const LITERALS: &str = r#"LITERALS

NUMBERS
  5, -1, 1.5, -2e3, 6.02E23

  Numerals without fraction or exponent are integers; all others are
  exact decimals.

STRINGS
  "John", 'John'

  Either quote style works. Escape the quote character by doubling it:

    name="say ""hi"""
    name='it''s'

  The canonical form always uses single quotes.

BOOLEANS AND NULL
  true, false, null

INFINITY
  Infinity, infinity, +Infinity, -infinity

DATES AND TIMES
  2024-01-31                      date
  2024-01-31T10:15:00Z            datetime
  2024-01-31T10:15:00.5+02:00     datetime with offset
  10:15, 10:15:30                 time

  Dates and times are recognized by their shape. A value that looks like a
  date but should be compared as text must be quoted: code="2024-01-31".

ARRAYS
  [1,2,3], ["a","b"]

  At least one item; no trailing comma. Items are literals only.

EXTERNAL CONSTANTS
  @now, @currentUser

  Placeholders filled in by the application, never by the filter author.
"#;

const VALIDATION: &str = r#"VALIDATION

After parsing, a filter is checked against the resource schema. Checking
stops at the first problem, reading the filter left to right.

ERROR CODES
  UNKNOWN_FIELD
    The path does not name a field of the resource.

  UNACCEPTED_FILTER_FIELD
    The field exists but cannot be used in filters.

  UNACCEPTED_FILTER_OPERATION
    The field does not accept the operator, e.g. >= on a boolean.

DEFAULT OPERATORS BY TYPE
  string                          all operators
  integer, number, date,
  datetime, time                  = != < <= > >= in !in
  boolean                         = != in !in
  object                          = !=

  Fields marked "array" leave out < <= > >= from their type's defaults.

SCHEMA FILE
  {
    "fields": {
      "givenName": { "type": "string" },
      "rate": { "type": "number", "filterable": false },
      "gender": { "type": "string", "operators": ["=", "!="] },
      "tags": { "type": "string", "array": true }
    }
  }

  qfilter validate 'gender>="M"' --schema "$(cat schema.json)"
  Validation error: UNACCEPTED_FILTER_OPERATION: operator '>=' is not accepted for field 'gender' (at 1:1)
"#;
