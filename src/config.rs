//! Parser limits.

/// Default nesting limit for parentheses and negations.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default limit on comparisons in one filter.
///
/// `a=1 and b=2 and ...` folds into a left-deep tree one level per link, so
/// this also bounds the depth that building, visiting and dropping a tree
/// recurse to.
pub const DEFAULT_MAX_TERMS: usize = 1024;

/// Options for [`crate::parse_with_options`].
///
/// Parsing has no timeout of its own; bounding `max_length` is how callers
/// bound the work done for untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject inputs longer than this many bytes before lexing
    pub max_length: Option<usize>,
    /// Maximum nesting of parentheses and negations
    pub max_depth: usize,
    /// Maximum number of comparisons
    pub max_terms: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_length: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_terms: DEFAULT_MAX_TERMS,
        }
    }
}

impl ParseOptions {
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms;
        self
    }
}
