use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::ast::{Position, Token, TokenKind};

/// Reserved words. Matching is exact and case-sensitive.
static KEYWORDS: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    HashMap::from([
        ("and", TokenKind::And),
        ("or", TokenKind::Or),
        ("not", TokenKind::Not),
        ("true", TokenKind::True),
        ("false", TokenKind::False),
        ("null", TokenKind::Null),
        ("in", TokenKind::In),
        ("like", TokenKind::Like),
        ("ilike", TokenKind::ILike),
        ("Infinity", TokenKind::Infinity),
        ("infinity", TokenKind::Infinity),
    ])
});

/// Keywords that can follow `!` to form a negated operator.
const NEGATED_KEYWORDS: [(&str, TokenKind); 3] = [
    ("ilike", TokenKind::NotILike),
    ("like", TokenKind::NotLike),
    ("in", TokenKind::NotIn),
];

/// Literal shapes tried at a digit, in priority order. The longest match wins.
static LITERAL_SHAPES: LazyLock<[(TokenKind, Regex); 4]> = LazyLock::new(|| {
    let shape = |pattern: &str| Regex::new(pattern).expect("literal shape pattern is valid");
    [
        (
            TokenKind::DateTime,
            shape(
                r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}(?::[0-9]{2}(?:\.[0-9]+)?)?(?:Z|[+-][0-9]{2}:[0-9]{2})?",
            ),
        ),
        (TokenKind::Date, shape(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}")),
        (
            TokenKind::Time,
            shape(r"^[0-9]{2}:[0-9]{2}(?::[0-9]{2}(?:\.[0-9]+)?)?"),
        ),
        (
            TokenKind::Number,
            shape(r"^[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?"),
        ),
    ]
});

/// Raised when no token rule matches at the current offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {position}")]
pub struct LexError {
    pub position: Position,
    pub message: String,
}

impl LexError {
    fn new(position: Position, message: impl Into<String>) -> Self {
        LexError {
            position,
            message: message.into(),
        }
    }
}

/// Converts filter text into tokens, one at a time.
pub struct Lexer<'a> {
    input: &'a str,
    position: Position,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: Position::START,
        }
    }

    /// Tokenize the entire input. The last token is always [`TokenKind::Eof`].
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    /// Current position in the input.
    pub fn position(&self) -> Position {
        self.position
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position.offset..]
    }

    fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        let skipped = &rest[..rest.len() - trimmed.len()];
        self.position = self.position.advanced_by(skipped);
    }

    /// Consumes `len` bytes and returns them as a token of `kind`.
    fn take(&mut self, kind: TokenKind, len: usize) -> Token {
        let start = self.position;
        let lexeme = &self.rest()[..len];
        self.position = start.advanced_by(lexeme);
        Token::new(kind, lexeme, start)
    }

    fn read_word(&mut self) -> Token {
        let len = identifier_len(self.rest());
        let word = &self.rest()[..len];
        let kind = KEYWORDS
            .get(word)
            .copied()
            .unwrap_or(TokenKind::Identifier);
        self.take(kind, len)
    }

    fn read_string(&mut self, quote: char) -> Result<Token, LexError> {
        let rest = self.rest();
        let mut chars = rest.char_indices().skip(1).peekable();

        while let Some((index, ch)) = chars.next() {
            if ch != quote {
                continue;
            }
            // A doubled quote is an escaped quote.
            if chars.peek().is_some_and(|&(_, next)| next == quote) {
                chars.next();
                continue;
            }
            return Ok(self.take(TokenKind::String, index + quote.len_utf8()));
        }

        Err(LexError::new(
            self.position,
            format!("unterminated string literal, missing closing {quote}"),
        ))
    }

    fn read_numeric(&mut self) -> Token {
        let rest = self.rest();
        let mut best: Option<(TokenKind, usize)> = None;
        for (kind, shape) in LITERAL_SHAPES.iter() {
            if let Some(found) = shape.find(rest)
                && best.is_none_or(|(_, len)| found.end() > len)
            {
                best = Some((*kind, found.end()));
            }
        }
        // The number shape matches any leading digit, so there is always a match.
        let (kind, len) = best.unwrap_or((TokenKind::Number, 1));
        self.take(kind, len)
    }

    fn read_bang(&mut self) -> Token {
        if self.peek_char(1) == Some('=') {
            return self.take(TokenKind::NotEq, 2);
        }
        let after = &self.rest()[1..];
        for (word, kind) in NEGATED_KEYWORDS {
            if after.starts_with(word) && identifier_len(after) == word.len() {
                return self.take(kind, 1 + word.len());
            }
        }
        self.take(TokenKind::Bang, 1)
    }

    fn read_doubled(&mut self, ch: char, kind: TokenKind) -> Result<Token, LexError> {
        if self.peek_char(1) == Some(ch) {
            Ok(self.take(kind, 2))
        } else {
            Err(LexError::new(
                self.position,
                format!("unexpected character '{ch}' (did you mean '{ch}{ch}'?)"),
            ))
        }
    }

    /// Produces the next token, or [`TokenKind::Eof`] once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(Token::new(TokenKind::Eof, "", self.position));
        };

        let token = match ch {
            '(' => self.take(TokenKind::LParen, 1),
            ')' => self.take(TokenKind::RParen, 1),
            '.' => self.take(TokenKind::Dot, 1),
            '@' => self.take(TokenKind::At, 1),
            '[' => self.take(TokenKind::LBracket, 1),
            ']' => self.take(TokenKind::RBracket, 1),
            ',' => self.take(TokenKind::Comma, 1),
            '+' => self.take(TokenKind::Plus, 1),
            '-' => self.take(TokenKind::Minus, 1),
            '*' => self.take(TokenKind::Star, 1),
            '/' => self.take(TokenKind::Slash, 1),
            '=' => self.take(TokenKind::Eq, 1),
            '<' if self.peek_char(1) == Some('=') => self.take(TokenKind::LtEq, 2),
            '<' => self.take(TokenKind::Lt, 1),
            '>' if self.peek_char(1) == Some('=') => self.take(TokenKind::GtEq, 2),
            '>' => self.take(TokenKind::Gt, 1),
            '!' => self.read_bang(),
            '&' => self.read_doubled('&', TokenKind::And)?,
            '|' => self.read_doubled('|', TokenKind::Or)?,
            '"' | '\'' => self.read_string(ch)?,
            c if c.is_ascii_digit() => self.read_numeric(),
            c if c.is_ascii_alphabetic() || c == '_' => self.read_word(),
            c => {
                return Err(LexError::new(
                    self.position,
                    format!("unexpected character '{c}'"),
                ));
            }
        };

        Ok(token)
    }
}

/// Length in bytes of the identifier at the start of `text` (0 if none).
fn identifier_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map_or(text.len(), |(index, _)| index)
}

/// Whether all of `text` would lex as a single identifier. Reserved words
/// such as `in` or `true` are not identifiers.
pub fn is_identifier(text: &str) -> bool {
    !text.is_empty() && identifier_len(text) == text.len() && !KEYWORDS.contains_key(text)
}

/// Whether all of `text` would lex as a single literal of `kind`.
pub fn is_literal(text: &str, kind: TokenKind) -> bool {
    LITERAL_SHAPES.iter().any(|(shape_kind, shape)| {
        *shape_kind == kind && shape.find(text).is_some_and(|found| found.end() == text.len())
    })
}

#[test]
fn test_keywords() {
    let tokens = Lexer::tokenize("and or not true false null in like ilike").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::In,
            TokenKind::Like,
            TokenKind::ILike,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_comparison_positions() {
    let mut lexer = Lexer::new("rate >= 5");
    let ident = lexer.next_token().unwrap();
    assert_eq!(ident.kind, TokenKind::Identifier);
    assert_eq!(ident.position.column, 1);

    let op = lexer.next_token().unwrap();
    assert_eq!(op.kind, TokenKind::GtEq);
    assert_eq!(op.position.offset, 5);
    assert_eq!(op.position.column, 6);

    let number = lexer.next_token().unwrap();
    assert_eq!(number.kind, TokenKind::Number);
    assert_eq!(number.lexeme, "5");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
fn test_identifier_and_literal_shapes() {
    assert!(is_identifier("countryCode"));
    assert!(is_identifier("_x1"));
    assert!(!is_identifier(""));
    assert!(!is_identifier("a b"));
    assert!(!is_identifier("1a"));
    assert!(!is_identifier("in"));
    assert!(!is_identifier("Infinity"));

    assert!(is_literal("2024-01-31", TokenKind::Date));
    assert!(!is_literal("2024-01-31", TokenKind::DateTime));
    assert!(is_literal("2024-01-31T10:15:00Z", TokenKind::DateTime));
    assert!(is_literal("10:15:30.5", TokenKind::Time));
    assert!(!is_literal("10:15 ", TokenKind::Time));
    assert!(!is_literal("tomorrow", TokenKind::Date));
}
