pub mod ast;
pub mod builder;
pub mod cli;
pub mod config;
pub mod lexer;
pub mod parser;
pub mod schema;
pub mod transform;
pub mod validator;
pub mod visitor;

pub use ast::{Expression, Operand, Position, Span, Token, TokenKind, Value};
pub use builder::{build, Builder};
pub use config::ParseOptions;
pub use lexer::{LexError, Lexer};
pub use parser::{parse, parse_with_options, ParseError, Parser};
pub use schema::{DataType, FieldDescriptor, FieldResolver, StaticSchema};
pub use transform::{ConstantBinder, Fold};
pub use validator::{validate, ValidationError, Validator};
pub use visitor::Visitor;

/// Splits `input` into tokens, ending with [`TokenKind::Eof`].
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::tokenize(input)
}
