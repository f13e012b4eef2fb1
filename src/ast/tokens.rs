use std::fmt;

/// A location in the filter text.
///
/// `offset` is a byte offset into the input; `line` and `column` are 1-based,
/// with columns counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// The position of the first character of any input.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    /// Returns the position reached after reading `text` from `self`.
    pub fn advanced_by(self, text: &str) -> Position {
        let mut pos = self;
        for ch in text.chars() {
            pos.offset += ch.len_utf8();
            if ch == '\n' {
                pos.line += 1;
                pos.column = 1;
            } else {
                pos.column += 1;
            }
        }
        pos
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Source range covered by an AST node. `end` points just past the last token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }
}

/// The lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `.` between identifier segments
    Dot,
    /// `@` before an external constant name
    At,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,` between array items
    Comma,

    // Keywords
    /// `not`
    Not,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// `Infinity` or `infinity`
    Infinity,

    // Arithmetic
    /// `+`, also the positive sign of a literal
    Plus,
    /// `-`, also the negative sign of a literal
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,

    // Comparison
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `in`
    In,
    /// `!in`
    NotIn,
    /// `like`
    Like,
    /// `!like`
    NotLike,
    /// `ilike`
    ILike,
    /// `!ilike`
    NotILike,

    // Logical
    /// `and` or `&&`
    And,
    /// `or` or `||`
    Or,
    /// `!` as a negation prefix
    Bang,

    /// `[A-Za-z_][A-Za-z0-9_]*` that is not a reserved word
    Identifier,

    // Literals
    /// `YYYY-MM-DD`
    Date,
    /// `YYYY-MM-DDTHH:MM[:SS[.fff]][Z|+HH:MM]`
    DateTime,
    /// `HH:MM[:SS[.fff]]`
    Time,
    /// Integer or decimal numeral, optionally with an exponent
    Number,
    /// Single- or double-quoted text
    String,

    /// End of input
    Eof,
}

impl TokenKind {
    pub fn is_comparison_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Eq | NotEq | Lt | LtEq | Gt | GtEq | In | NotIn | Like | NotLike | ILike | NotILike
        )
    }

    pub fn is_logical_operator(self) -> bool {
        matches!(self, TokenKind::And | TokenKind::Or)
    }

    /// Tokens that may open a literal value (signs included).
    pub fn starts_value(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            True | False
                | Null
                | Infinity
                | Plus
                | Minus
                | Date
                | DateTime
                | Time
                | Number
                | String
        )
    }

    /// Human-readable name used in syntax error messages.
    pub fn describe(self) -> &'static str {
        use TokenKind::*;
        match self {
            LParen => "'('",
            RParen => "')'",
            Dot => "'.'",
            At => "'@'",
            LBracket => "'['",
            RBracket => "']'",
            Comma => "','",
            Not => "'not'",
            True => "'true'",
            False => "'false'",
            Null => "'null'",
            Infinity => "'Infinity'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Eq => "'='",
            NotEq => "'!='",
            Lt => "'<'",
            LtEq => "'<='",
            Gt => "'>'",
            GtEq => "'>='",
            In => "'in'",
            NotIn => "'!in'",
            Like => "'like'",
            NotLike => "'!like'",
            ILike => "'ilike'",
            NotILike => "'!ilike'",
            And => "'and'",
            Or => "'or'",
            Bang => "'!'",
            Identifier => "identifier",
            Date => "date",
            DateTime => "datetime",
            Time => "time",
            Number => "number",
            String => "string",
            Eof => "end of input",
        }
    }
}

/// A lexical token: its class, the exact source text, and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    /// Position just past the last character of the token.
    pub fn end(&self) -> Position {
        self.position.advanced_by(&self.lexeme)
    }

    pub fn span(&self) -> Span {
        Span::new(self.position, self.end())
    }

    /// Decoded content of a string token: quotes removed, doubled quotes collapsed.
    ///
    /// Returns `None` for any other kind of token.
    pub fn unquoted(&self) -> Option<String> {
        if self.kind != TokenKind::String {
            return None;
        }
        let quote = self.lexeme.chars().next()?;
        let inner = self
            .lexeme
            .get(quote.len_utf8()..self.lexeme.len() - quote.len_utf8())?;
        let doubled: String = [quote, quote].iter().collect();
        Some(inner.replace(&doubled, &quote.to_string()))
    }

    /// How the token is shown in "found ..." error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => self.kind.describe().to_string(),
            _ => format!("'{}'", self.lexeme),
        }
    }
}
