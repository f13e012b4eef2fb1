use std::{mem, str::FromStr};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, debug_span, trace};

use crate::{
    ast::{
        ArrayValue, ComparisonExpression, ComparisonOperator, Expression, ExternalConstant,
        LogicalExpression, LogicalOperator, NegativeExpression, Operand, ParenthesizedExpression,
        PolarityOperator, Position, QualifiedIdentifier, Span, Token, TokenKind, Value,
    },
    config::ParseOptions,
    lexer::{LexError, Lexer},
};

/// Errors raised while turning filter text into an AST.
///
/// Parsing stops at the first error; no partial tree is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No token rule matched
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A token appeared where the grammar does not allow it
    #[error("expected {expected}, found {found} at {position}")]
    Syntax {
        expected: String,
        found: String,
        position: Position,
    },

    /// Input rejected by [`ParseOptions::max_length`] before lexing
    #[error("filter is {length} bytes long, the limit is {limit}")]
    InputTooLong { length: usize, limit: usize },

    /// Parentheses and negations nested deeper than [`ParseOptions::max_depth`]
    #[error("filter nests deeper than {limit} levels at {position}")]
    TooDeep { limit: usize, position: Position },

    /// More comparisons than [`ParseOptions::max_terms`]
    #[error("filter has more than {limit} comparisons at {position}")]
    TooManyTerms { limit: usize, position: Position },
}

impl ParseError {
    /// Where the error was detected. Length errors point at the start of the input.
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(err) => err.position,
            ParseError::Syntax { position, .. }
            | ParseError::TooDeep { position, .. }
            | ParseError::TooManyTerms { position, .. } => *position,
            ParseError::InputTooLong { .. } => Position::START,
        }
    }
}

/// Parses filter text with default [`ParseOptions`].
///
/// ```
/// use query_filter::{ast::Expression, parse};
///
/// let expr = parse(r#"givenName="John" and rate>=5"#).unwrap();
/// assert!(matches!(expr, Expression::Logical(_)));
/// ```
pub fn parse(input: &str) -> Result<Expression, ParseError> {
    parse_with_options(input, &ParseOptions::default())
}

/// Parses filter text, enforcing the limits in `options`.
pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Expression, ParseError> {
    let span = debug_span!(target: "query_filter", "parse", length = input.len());
    let _guard = span.enter();

    if let Some(limit) = options.max_length
        && input.len() > limit
    {
        debug!(target: "query_filter", length = input.len(), limit, "filter rejected, too long");
        return Err(ParseError::InputTooLong {
            length: input.len(),
            limit,
        });
    }

    let result = Parser::with_options(Lexer::new(input), options).and_then(|mut p| p.parse());
    match &result {
        Ok(expr) => trace!(target: "query_filter", nodes = expr.node_count(), "filter parsed"),
        Err(err) => debug!(
            target: "query_filter",
            position = %err.position(),
            error = %err,
            "filter rejected"
        ),
    }
    result
}

/// Recursive-descent parser over a [`Lexer`].
///
/// Grammar, loosest binding first:
///
/// ```text
/// expression  := unary (logical_op unary)*          left-associative, one tier
/// unary       := ('not' | '!') unary | primary
/// primary     := '(' expression ')' | comparison
/// comparison  := path comparison_op operand
/// operand     := value | path | '@' identifier | array
/// array       := '[' value (',' value)* ']'
/// path        := identifier ('.' identifier)*
/// value       := ('+' | '-')? (number | 'Infinity') | string | date | datetime
///              | time | 'true' | 'false' | 'null'
/// ```
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
    previous_end: Position,
    depth: usize,
    max_depth: usize,
    terms: usize,
    max_terms: usize,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Result<Self, ParseError> {
        Self::with_options(lexer, &ParseOptions::default())
    }

    pub fn with_options(mut lexer: Lexer<'a>, options: &ParseOptions) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            previous_end: current_token.position,
            current_token,
            depth: 0,
            max_depth: options.max_depth,
            terms: 0,
            max_terms: options.max_terms,
        })
    }

    /// Consumes the current token and returns it.
    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        let token = mem::replace(&mut self.current_token, next);
        self.previous_end = token.end();
        Ok(token)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_token.kind == kind
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.error(expected))
        }
    }

    fn error(&self, expected: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            expected: expected.into(),
            found: self.current_token.describe(),
            position: self.current_token.position,
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
                position: self.current_token.position,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Parses a complete filter; anything after the expression is an error.
    pub fn parse(&mut self) -> Result<Expression, ParseError> {
        let expr = self.parse_expression(0)?;
        if !self.check(TokenKind::Eof) {
            return Err(self.error("logical operator or end of input"));
        }
        Ok(expr)
    }

    /// Precedence climbing over logical operators.
    ///
    /// Only operators binding at least as tightly as `min_precedence` are
    /// folded in here; the right operand is parsed one level higher, which
    /// makes chains fold left to right.
    pub fn parse_expression(&mut self, min_precedence: u8) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(operator) = LogicalOperator::from_token(self.current_token.kind) {
            let precedence = operator.precedence();
            if precedence < min_precedence {
                break;
            }
            self.advance()?;
            let right = self.parse_expression(precedence + 1)?;

            left = Expression::Logical(LogicalExpression {
                span: left.span().to(right.span()),
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    /// Negation is right-associative and applies to the next unary expression.
    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        if !matches!(self.current_token.kind, TokenKind::Not | TokenKind::Bang) {
            return self.parse_primary();
        }

        self.enter()?;
        let start = self.advance()?.position;
        let inner = self.parse_unary()?;
        self.leave();

        Ok(Expression::Negative(NegativeExpression {
            operator: PolarityOperator::Not,
            span: Span::new(start, inner.span().end),
            inner: Box::new(inner),
        }))
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        match self.current_token.kind {
            TokenKind::LParen => {
                self.enter()?;
                let start = self.advance()?.position;
                let inner = self.parse_expression(0)?;
                self.expect(TokenKind::RParen, "')' or logical operator")?;
                self.leave();

                Ok(Expression::Parenthesized(ParenthesizedExpression {
                    inner: Box::new(inner),
                    span: Span::new(start, self.previous_end),
                }))
            }
            TokenKind::Identifier => self.parse_comparison(),
            _ => Err(self.error("comparison, '(' or 'not'")),
        }
    }

    fn parse_comparison(&mut self) -> Result<Expression, ParseError> {
        if self.terms >= self.max_terms {
            return Err(ParseError::TooManyTerms {
                limit: self.max_terms,
                position: self.current_token.position,
            });
        }
        self.terms += 1;

        let left = self.parse_qualified_identifier()?;

        let Some(operator) = ComparisonOperator::from_token(self.current_token.kind) else {
            return Err(self.error("comparison operator"));
        };
        self.advance()?;

        let right = self.parse_operand()?;
        Ok(Expression::Comparison(ComparisonExpression {
            span: left.span.to(right.span()),
            left,
            operator,
            right,
        }))
    }

    fn parse_qualified_identifier(&mut self) -> Result<QualifiedIdentifier, ParseError> {
        let first = self.expect(TokenKind::Identifier, "identifier")?;
        let start = first.position;
        let mut segments = vec![first.lexeme];

        while self.check(TokenKind::Dot) {
            self.advance()?;
            let segment = self.expect(TokenKind::Identifier, "identifier after '.'")?;
            segments.push(segment.lexeme);
        }

        Ok(QualifiedIdentifier {
            segments,
            span: Span::new(start, self.previous_end),
        })
    }

    /// Right-hand side of a comparison, chosen by the class of the current token.
    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        match self.current_token.kind {
            TokenKind::At => {
                let start = self.advance()?.position;
                let name = self.expect(TokenKind::Identifier, "constant name after '@'")?;
                Ok(Operand::Constant(ExternalConstant {
                    name: name.lexeme,
                    span: Span::new(start, self.previous_end),
                }))
            }
            TokenKind::LBracket => Ok(Operand::Array(self.parse_array()?)),
            TokenKind::Identifier => Ok(Operand::Identifier(self.parse_qualified_identifier()?)),
            kind if kind.starts_value() => Ok(Operand::Value(self.parse_value()?)),
            _ => Err(self.error("one of [value, identifier, '@', '[']")),
        }
    }

    fn parse_array(&mut self) -> Result<ArrayValue, ParseError> {
        let start = self.expect(TokenKind::LBracket, "'['")?.position;
        let mut items = vec![self.parse_value()?];

        while self.check(TokenKind::Comma) {
            self.advance()?;
            items.push(self.parse_value()?);
        }
        self.expect(TokenKind::RBracket, "',' or ']'")?;

        Ok(ArrayValue {
            items,
            span: Span::new(start, self.previous_end),
        })
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let start = self.current_token.position;
        let polarity = match self.current_token.kind {
            TokenKind::Plus => Some(PolarityOperator::Positive),
            TokenKind::Minus => Some(PolarityOperator::Negative),
            _ => None,
        };
        if polarity.is_some() {
            self.advance()?;
        }

        match self.current_token.kind {
            TokenKind::Number => {
                let negative = polarity == Some(PolarityOperator::Negative);
                self.parse_number(start, negative)
            }
            TokenKind::Infinity => {
                self.advance()?;
                Ok(Value::Infinity {
                    polarity,
                    span: Span::new(start, self.previous_end),
                })
            }
            _ if polarity.is_some() => Err(self.error("number or Infinity after sign")),
            TokenKind::String => {
                let token = self.advance()?;
                Ok(Value::String {
                    value: token.unquoted().unwrap_or_default(),
                    span: token.span(),
                })
            }
            TokenKind::True | TokenKind::False => {
                let token = self.advance()?;
                Ok(Value::Boolean {
                    value: token.kind == TokenKind::True,
                    span: token.span(),
                })
            }
            TokenKind::Null => {
                let token = self.advance()?;
                Ok(Value::Null { span: token.span() })
            }
            TokenKind::Date => {
                let token = self.advance()?;
                Ok(Value::Date {
                    span: token.span(),
                    value: token.lexeme,
                })
            }
            TokenKind::DateTime => {
                let token = self.advance()?;
                Ok(Value::DateTime {
                    span: token.span(),
                    value: token.lexeme,
                })
            }
            TokenKind::Time => {
                let token = self.advance()?;
                Ok(Value::Time {
                    span: token.span(),
                    value: token.lexeme,
                })
            }
            _ => Err(self.error("value")),
        }
    }

    /// Plain digit runs that fit `i64` become integers; everything else is an
    /// exact decimal. The sign is folded into the value.
    fn parse_number(&mut self, start: Position, negative: bool) -> Result<Value, ParseError> {
        let position = self.current_token.position;
        let lexeme = self.current_token.lexeme.clone();
        let sign = if negative { "-" } else { "" };

        let is_plain = lexeme.bytes().all(|b| b.is_ascii_digit());
        if is_plain && let Ok(value) = format!("{sign}{lexeme}").parse::<i64>() {
            self.advance()?;
            return Ok(Value::Integer {
                value,
                span: Span::new(start, self.previous_end),
            });
        }

        let parsed = if lexeme.contains(['e', 'E']) {
            Decimal::from_scientific(&lexeme.to_ascii_lowercase()).ok()
        } else {
            Decimal::from_str(&lexeme).ok()
        };
        let Some(magnitude) = parsed else {
            return Err(ParseError::Syntax {
                expected: "number within range".to_string(),
                found: format!("'{lexeme}'"),
                position,
            });
        };

        self.advance()?;
        Ok(Value::Number {
            value: if negative { -magnitude } else { magnitude },
            span: Span::new(start, self.previous_end),
        })
    }
}
