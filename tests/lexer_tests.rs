// tests/lexer_tests.rs

use query_filter::lexer::Lexer;
use query_filter::{tokenize, TokenKind};

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

// ============================================================================
// Single Character Tokens
// ============================================================================

#[test]
fn test_punctuation() {
    assert_eq!(
        kinds("( ) . @ [ ] ,"),
        vec![
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Dot,
            TokenKind::At,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Comma,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_arithmetic_and_simple_comparison() {
    assert_eq!(
        kinds("+ - * / = < >"),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Eq,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_empty_input() {
    let tokens = tokenize("").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!(tokens[0].position.offset, 0);

    assert_eq!(kinds("   \t\n "), vec![TokenKind::Eof]);
}

// ============================================================================
// Two Character Tokens
// ============================================================================

#[test]
fn test_two_character_operators() {
    assert_eq!(
        kinds("<= >= != && ||"),
        vec![
            TokenKind::LtEq,
            TokenKind::GtEq,
            TokenKind::NotEq,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_tight_comparison() {
    let tokens = tokenize("rate>=1").unwrap();
    assert_eq!(tokens[0].lexeme, "rate");
    assert_eq!(tokens[1].kind, TokenKind::GtEq);
    assert_eq!(tokens[2].lexeme, "1");
}

#[test]
fn test_single_ampersand_or_pipe_is_error() {
    let err = tokenize("a=1 & b=2").unwrap_err();
    assert_eq!(err.position.offset, 4);
    assert!(err.message.contains("'&'"));

    let err = tokenize("a=1 | b=2").unwrap_err();
    assert_eq!(err.position.column, 5);
}

// ============================================================================
// Negated Operators
// ============================================================================

#[test]
fn test_negated_keywords() {
    assert_eq!(
        kinds("!in !like !ilike"),
        vec![
            TokenKind::NotIn,
            TokenKind::NotLike,
            TokenKind::NotILike,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_negated_keyword_before_bracket() {
    assert_eq!(
        kinds("status !in[1]"),
        vec![
            TokenKind::Identifier,
            TokenKind::NotIn,
            TokenKind::LBracket,
            TokenKind::Number,
            TokenKind::RBracket,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_bang_before_identifier_is_negation() {
    // `!inside` is a negated comparison on the field `inside`, not `!in side`
    let tokens = tokenize("!inside=1").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Bang);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].lexeme, "inside");
}

// ============================================================================
// Keywords
// ============================================================================

#[test]
fn test_literal_keywords() {
    assert_eq!(
        kinds("true false null Infinity infinity"),
        vec![
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::Infinity,
            TokenKind::Infinity,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keywords_are_case_sensitive() {
    assert_eq!(
        kinds("AND Or NOT True NULL INFINITY"),
        vec![TokenKind::Identifier; 6]
            .into_iter()
            .chain([TokenKind::Eof])
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let tokens = tokenize("android orders notes inbox").unwrap();
    assert!(tokens[..4].iter().all(|t| t.kind == TokenKind::Identifier));
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_identifiers() {
    let tokens = tokenize("_id givenName address2 snake_case").unwrap();
    let lexemes: Vec<_> = tokens[..4].iter().map(|t| t.lexeme.as_str()).collect();
    assert_eq!(lexemes, ["_id", "givenName", "address2", "snake_case"]);
    assert!(tokens[..4].iter().all(|t| t.kind == TokenKind::Identifier));
}

#[test]
fn test_dot_path() {
    assert_eq!(
        kinds("address.countryCode"),
        vec![
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

// ============================================================================
// Numbers, Dates and Times
// ============================================================================

#[test]
fn test_numbers() {
    let tokens = tokenize("5 1.5 2e3 6.02E23 1e-7").unwrap();
    let lexemes: Vec<_> = tokens[..5].iter().map(|t| t.lexeme.as_str()).collect();
    assert_eq!(lexemes, ["5", "1.5", "2e3", "6.02E23", "1e-7"]);
    assert!(tokens[..5].iter().all(|t| t.kind == TokenKind::Number));
}

#[test]
fn test_sign_is_separate_token() {
    assert_eq!(
        kinds("-1.1"),
        vec![TokenKind::Minus, TokenKind::Number, TokenKind::Eof]
    );
}

#[test]
fn test_number_without_fraction_digits() {
    // A dot needs digits after it to be part of the number
    assert_eq!(
        kinds("1."),
        vec![TokenKind::Number, TokenKind::Dot, TokenKind::Eof]
    );
}

#[test]
fn test_date() {
    let tokens = tokenize("2024-01-31").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Date);
    assert_eq!(tokens[0].lexeme, "2024-01-31");
    assert_eq!(tokens[1].kind, TokenKind::Eof);
}

#[test]
fn test_datetime() {
    for input in [
        "2024-01-31T10:15",
        "2024-01-31T10:15:00",
        "2024-01-31T10:15:00Z",
        "2024-01-31T10:15:00.123+02:00",
        "2024-01-31T10:15:00-05:00",
    ] {
        let tokens = tokenize(input).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::DateTime, "{input}");
        assert_eq!(tokens[0].lexeme, input);
        assert_eq!(tokens[1].kind, TokenKind::Eof, "{input}");
    }
}

#[test]
fn test_time() {
    for input in ["10:15", "10:15:30", "10:15:30.25"] {
        let tokens = tokenize(input).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Time, "{input}");
        assert_eq!(tokens[0].lexeme, input);
    }
}

#[test]
fn test_date_shape_beats_number() {
    // Longest shape wins: `2024` alone would be a number
    assert_eq!(
        kinds("d>=2024-01-31 and n>=2024"),
        vec![
            TokenKind::Identifier,
            TokenKind::GtEq,
            TokenKind::Date,
            TokenKind::And,
            TokenKind::Identifier,
            TokenKind::GtEq,
            TokenKind::Number,
            TokenKind::Eof,
        ]
    );
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_double_quoted_string() {
    let tokens = tokenize(r#""John""#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].lexeme, r#""John""#);
    assert_eq!(tokens[0].unquoted().as_deref(), Some("John"));
}

#[test]
fn test_single_quoted_string() {
    let tokens = tokenize("'John'").unwrap();
    assert_eq!(tokens[0].unquoted().as_deref(), Some("John"));
}

#[test]
fn test_doubled_quote_escape() {
    let tokens = tokenize(r#"'it''s' "say ""hi""""#).unwrap();
    assert_eq!(tokens[0].unquoted().as_deref(), Some("it's"));
    assert_eq!(tokens[1].unquoted().as_deref(), Some(r#"say "hi""#));
}

#[test]
fn test_other_quote_needs_no_escape() {
    let tokens = tokenize(r#""it's" 'say "hi"'"#).unwrap();
    assert_eq!(tokens[0].unquoted().as_deref(), Some("it's"));
    assert_eq!(tokens[1].unquoted().as_deref(), Some(r#"say "hi""#));
}

#[test]
fn test_empty_string() {
    let tokens = tokenize("''").unwrap();
    assert_eq!(tokens[0].unquoted().as_deref(), Some(""));
}

#[test]
fn test_date_shaped_string_stays_string() {
    let tokens = tokenize(r#""2024-01-31""#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::String);
}

#[test]
fn test_unterminated_string() {
    let err = tokenize(r#"name="John"#).unwrap_err();
    assert_eq!(err.position.offset, 5);
    assert!(err.message.contains("unterminated"));
}

#[test]
fn test_unquoted_on_other_tokens() {
    let tokens = tokenize("name").unwrap();
    assert_eq!(tokens[0].unquoted(), None);
}

// ============================================================================
// Positions and Errors
// ============================================================================

#[test]
fn test_positions_across_lines() {
    let tokens = tokenize("a=1\nand b=2").unwrap();
    let and = &tokens[3];
    assert_eq!(and.kind, TokenKind::And);
    assert_eq!(and.position.offset, 4);
    assert_eq!(and.position.line, 2);
    assert_eq!(and.position.column, 1);

    let b = &tokens[4];
    assert_eq!(b.position.line, 2);
    assert_eq!(b.position.column, 5);
}

#[test]
fn test_columns_count_characters() {
    let tokens = tokenize("name='é' or x=1").unwrap();
    let or = &tokens[3];
    assert_eq!(or.kind, TokenKind::Or);
    assert_eq!(or.position.offset, 10);
    assert_eq!(or.position.column, 10);
}

#[test]
fn test_token_end_and_span() {
    let tokens = tokenize("rate >= 5").unwrap();
    assert_eq!(tokens[1].end().offset, 7);
    assert_eq!(tokens[1].span().start.offset, 5);
}

#[test]
fn test_unexpected_character() {
    let err = tokenize("Customers@1?pick").unwrap_err();
    assert_eq!(err.position.offset, 11);
    assert_eq!(err.to_string(), "unexpected character '?' at 1:12");
}

#[test]
fn test_lexer_is_lazy() {
    // Tokens before the bad character are still produced one by one
    let mut lexer = Lexer::new("a # b");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier);
    assert!(lexer.next_token().is_err());
}

#[test]
fn test_eof_repeats() {
    let mut lexer = Lexer::new("a");
    lexer.next_token().unwrap();
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.position().offset, 1);
}

// ============================================================================
// Token Classes
// ============================================================================

#[test]
fn test_token_classes() {
    let tokens = tokenize("a >= 1 and !b in [2] || c ilike 'x'").unwrap();
    let comparisons: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind.is_comparison_operator())
        .map(|t| t.lexeme.as_str())
        .collect();
    assert_eq!(comparisons, [">=", "in", "ilike"]);

    let logical = tokens.iter().filter(|t| t.kind.is_logical_operator()).count();
    assert_eq!(logical, 2);

    assert!(TokenKind::Minus.starts_value());
    assert!(!TokenKind::Identifier.starts_value());
    assert_eq!(TokenKind::NotILike.describe(), "'!ilike'");
    assert_eq!(tokens.last().unwrap().describe(), "end of input");
    assert_eq!(tokens[0].describe(), "'a'");
}
