// tests/integration_tests.rs

use std::sync::Arc;
use std::thread;

use query_filter::cli::{
    execute_check, filter_to_json, get_doc_category, get_docs_overview, json_to_filter,
    CheckOptions, CheckResult, CliError, DocCategory, Mode,
};
use query_filter::config::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_TERMS};
use query_filter::schema::{DataType, FieldDescriptor, StaticSchema};
use query_filter::{build, parse, validate, Expression, ParseOptions};
use serde_json::json;

const SCHEMA: &str = r#"{
    "fields": {
        "givenName": { "type": "string" },
        "rate": { "type": "number", "filterable": false },
        "gender": { "type": "string", "operators": ["=", "!="] },
        "status": { "type": "integer" }
    }
}"#;

fn options(filter: &str, mode: Mode) -> CheckOptions {
    CheckOptions {
        filter: filter.to_string(),
        mode,
        ..Default::default()
    }
}

// ============================================================================
// JSON Shape
// ============================================================================

#[test]
fn test_comparison_json_shape() {
    let expr = parse("address.countryCode=1").unwrap();
    assert_eq!(
        filter_to_json(&expr).unwrap(),
        json!({
            "kind": "ComparisonExpression",
            "left": {
                "kind": "QualifiedIdentifier",
                "segments": ["address", "countryCode"]
            },
            "operator": "=",
            "right": { "kind": "IntegerLiteral", "value": 1 }
        })
    );
}

#[test]
fn test_logical_json_shape() {
    let expr = parse("not (a in ['x']) or b<@now").unwrap();
    assert_eq!(
        filter_to_json(&expr).unwrap(),
        json!({
            "kind": "LogicalExpression",
            "left": {
                "kind": "NegativeExpression",
                "operator": "not",
                "inner": {
                    "kind": "ParenthesizedExpression",
                    "inner": {
                        "kind": "ComparisonExpression",
                        "left": { "kind": "QualifiedIdentifier", "segments": ["a"] },
                        "operator": "in",
                        "right": {
                            "kind": "ArrayValue",
                            "items": [{ "kind": "StringLiteral", "value": "x" }]
                        }
                    }
                }
            },
            "operator": "or",
            "right": {
                "kind": "ComparisonExpression",
                "left": { "kind": "QualifiedIdentifier", "segments": ["b"] },
                "operator": "<",
                "right": { "kind": "ExternalConstant", "name": "now" }
            }
        })
    );
}

#[test]
fn test_literal_kinds_in_json() {
    let expr = parse(
        "a in [1, 1.5, 'x', true, null, 2024-01-31, 2024-01-31T10:15:00Z, 10:15, -Infinity]",
    )
    .unwrap();
    let json = filter_to_json(&expr).unwrap();
    let kinds: Vec<&str> = json["right"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        [
            "IntegerLiteral",
            "NumberLiteral",
            "StringLiteral",
            "BooleanLiteral",
            "NullLiteral",
            "DateLiteral",
            "DateTimeLiteral",
            "TimeLiteral",
            "InfinityLiteral"
        ]
    );
    assert_eq!(json["right"]["items"][8]["polarity"], "-");
    assert_eq!(json["right"]["items"][7]["value"], "10:15");
}

#[test]
fn test_json_round_trip() {
    for input in [
        "a=1 and (b.c='x' or not d<@now)",
        "s in [1, 2.5, 'q', false, null] || t>=2024-01-31",
        "x=+Infinity and y!=infinity and z>updatedAt",
        "n=-0.001 and m=2e3",
    ] {
        let expr = parse(input).unwrap();
        let json = filter_to_json(&expr).unwrap();
        let back = json_to_filter(json).unwrap();
        assert!(back.structurally_eq(&expr), "{input}");
        assert_eq!(build(&back), build(&expr), "{input}");
    }
}

#[test]
fn test_json_with_unknown_kind_is_rejected() {
    let json = json!({ "kind": "BetweenExpression", "low": 1, "high": 2 });
    assert!(json_to_filter(json).is_err());
}

fn comparison_json(left: serde_json::Value, right: serde_json::Value) -> serde_json::Value {
    json!({
        "kind": "ComparisonExpression",
        "left": left,
        "operator": "in",
        "right": right
    })
}

#[test]
fn test_json_path_must_be_identifiers() {
    let one = json!({ "kind": "IntegerLiteral", "value": 1 });
    for segments in [json!([]), json!(["a b"]), json!(["in"]), json!(["a", ""]), json!(["1st"])] {
        let path = json!({ "kind": "QualifiedIdentifier", "segments": segments.clone() });
        let err = json_to_filter(comparison_json(path, one.clone())).unwrap_err();
        assert!(err.is_data(), "{segments}: {err}");
    }

    let right = json!({ "kind": "QualifiedIdentifier", "segments": ["or"] });
    let path = json!({ "kind": "QualifiedIdentifier", "segments": ["a"] });
    assert!(json_to_filter(comparison_json(path, right)).is_err());
}

#[test]
fn test_json_array_must_not_be_empty() {
    let path = json!({ "kind": "QualifiedIdentifier", "segments": ["a"] });
    let empty = json!({ "kind": "ArrayValue", "items": [] });
    assert!(json_to_filter(comparison_json(path, empty)).is_err());
}

#[test]
fn test_json_constant_name_must_be_identifier() {
    let path = json!({ "kind": "QualifiedIdentifier", "segments": ["a"] });
    let constant = json!({ "kind": "ExternalConstant", "name": "next week" });
    assert!(json_to_filter(comparison_json(path, constant)).is_err());
}

#[test]
fn test_json_negation_must_use_not() {
    let inner = json!({
        "kind": "ComparisonExpression",
        "left": { "kind": "QualifiedIdentifier", "segments": ["a"] },
        "operator": "=",
        "right": { "kind": "IntegerLiteral", "value": 1 }
    });
    for operator in ["+", "-"] {
        let json = json!({ "kind": "NegativeExpression", "operator": operator, "inner": inner.clone() });
        let err = json_to_filter(json).unwrap_err();
        assert!(err.to_string().contains("a negation takes 'not'"), "{err}");
    }

    let json = json!({ "kind": "NegativeExpression", "operator": "not", "inner": inner });
    assert_eq!(build(&json_to_filter(json).unwrap()), "not a=1");
}

#[test]
fn test_json_literals_must_have_their_shape() {
    let path = || json!({ "kind": "QualifiedIdentifier", "segments": ["a"] });
    for item in [
        json!({ "kind": "DateLiteral", "value": "tomorrow" }),
        json!({ "kind": "DateLiteral", "value": "2024-01-31T10:15" }),
        json!({ "kind": "DateTimeLiteral", "value": "2024-01-31" }),
        json!({ "kind": "TimeLiteral", "value": "10" }),
        json!({ "kind": "InfinityLiteral", "polarity": "not" }),
    ] {
        let array = json!({ "kind": "ArrayValue", "items": [item.clone()] });
        assert!(json_to_filter(comparison_json(path(), array)).is_err(), "{item}");
    }

    let array = json!({
        "kind": "ArrayValue",
        "items": [
            { "kind": "DateLiteral", "value": "2024-01-31" },
            { "kind": "TimeLiteral", "value": "10:15" },
            { "kind": "InfinityLiteral", "polarity": null },
            { "kind": "InfinityLiteral" }
        ]
    });
    let expr = json_to_filter(comparison_json(path(), array)).unwrap();
    assert_eq!(build(&expr), "a in [2024-01-31,10:15,Infinity,Infinity]");
}

#[test]
fn test_accepted_json_rebuilds_to_the_same_tree() {
    // Everything accepted from JSON prints as text that parses back to it
    let json = json!({
        "kind": "LogicalExpression",
        "left": {
            "kind": "NegativeExpression",
            "operator": "not",
            "inner": comparison_json(
                json!({ "kind": "QualifiedIdentifier", "segments": ["address", "tags"] }),
                json!({ "kind": "ArrayValue", "items": [{ "kind": "StringLiteral", "value": "x" }] })
            )
        },
        "operator": "and",
        "right": comparison_json(
            json!({ "kind": "QualifiedIdentifier", "segments": ["b"] }),
            json!({ "kind": "ExternalConstant", "name": "now" })
        )
    });
    let expr = json_to_filter(json).unwrap();
    let reparsed = parse(&build(&expr)).unwrap();
    assert!(reparsed.structurally_eq(&expr));
}

#[test]
fn test_handwritten_json_tree() {
    let json = json!({
        "kind": "ComparisonExpression",
        "left": { "kind": "QualifiedIdentifier", "segments": ["rate"] },
        "operator": ">=",
        "right": { "kind": "IntegerLiteral", "value": 5 }
    });
    let expr = json_to_filter(json).unwrap();
    assert_eq!(build(&expr), "rate>=5");
}

// ============================================================================
// Parse, Build, Validate Pipeline
// ============================================================================

#[test]
fn test_query_string_pipeline() {
    let schema = StaticSchema::new()
        .field("givenname", FieldDescriptor::new(DataType::String))
        .field("rate", FieldDescriptor::new(DataType::Number));

    let expr = parse(r#"givenname="John" and rate>=1"#).unwrap();
    validate(&expr, &schema).unwrap();
    assert_eq!(expr.to_string(), "givenname='John' and rate>=1");
}

#[test]
fn test_parse_errors_and_validation_errors_are_separate() {
    assert!(parse("rate>=").is_err());

    let expr = parse("rating>=1").unwrap();
    let schema = StaticSchema::new().field("rate", FieldDescriptor::new(DataType::Number));
    assert_eq!(validate(&expr, &schema).unwrap_err().code(), "UNKNOWN_FIELD");
}

#[test]
fn test_longest_accepted_filter_survives_every_stage() {
    // A chain at the term limit inside the deepest allowed grouping
    let chain = vec!["a=1"; DEFAULT_MAX_TERMS].join(" and ");
    let nesting = DEFAULT_MAX_DEPTH - 1;
    let input = format!("{}{chain}{}", "(".repeat(nesting), ")".repeat(nesting));

    let expr = parse(&input).unwrap();
    let text = build(&expr);
    assert!(text.starts_with("a=1 and a=1"));
    assert!(parse(&text).unwrap().structurally_eq(&expr));

    let schema = StaticSchema::new().field("a", FieldDescriptor::new(DataType::Integer));
    validate(&expr, &schema).unwrap();
    assert_eq!(expr.node_count(), 4 * DEFAULT_MAX_TERMS - 1 + nesting);
    drop(expr);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_parallel_parsing() {
    let inputs: Arc<Vec<String>> = Arc::new(
        (0..50)
            .map(|i| format!("f{i}>={i} and (g='{i}' or not h in [{i},{}])", i + 1))
            .collect(),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let inputs = Arc::clone(&inputs);
            thread::spawn(move || {
                inputs
                    .iter()
                    .map(|input| build(&parse(input).unwrap()))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let expected: Vec<String> = inputs.iter().map(|s| build(&parse(s).unwrap())).collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_trees_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Expression>();

    let expr = Arc::new(parse("a=1 or b=2").unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let expr = Arc::clone(&expr);
            thread::spawn(move || build(&expr))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), "a=1 or b=2");
    }
}

// ============================================================================
// CLI Commands
// ============================================================================

#[test]
fn test_cli_check() {
    let result = execute_check(&options("rate>=1", Mode::Check)).unwrap();
    assert!(matches!(result, CheckResult::SyntaxValid));
}

#[test]
fn test_cli_check_trims_input() {
    let result = execute_check(&options("  rate>=1\n", Mode::Check)).unwrap();
    assert!(matches!(result, CheckResult::SyntaxValid));
}

#[test]
fn test_cli_check_syntax_error() {
    let err = execute_check(&options("Customers@1?pick", Mode::Check)).unwrap_err();
    assert!(matches!(err, CliError::Parse(_)));
    assert_eq!(
        err.to_string(),
        "Parse error: expected comparison operator, found '@' at 1:10"
    );
}

#[test]
fn test_cli_empty_input() {
    let err = execute_check(&options("   ", Mode::Check)).unwrap_err();
    assert!(matches!(err, CliError::NoInput));
}

#[test]
fn test_cli_format() {
    let result = execute_check(&options(r#"( a = "x" ) && b >= 2"#, Mode::Format)).unwrap();
    match result {
        CheckResult::Formatted(text) => assert_eq!(text, "a='x' and b>=2"),
        other => panic!("Expected formatted text, got {other:?}"),
    }

    let spaced = CheckOptions {
        spaced: true,
        ..options("a=1 and b in [1,2]", Mode::Format)
    };
    match execute_check(&spaced).unwrap() {
        CheckResult::Formatted(text) => assert_eq!(text, "a = 1 and b in [1, 2]"),
        other => panic!("Expected formatted text, got {other:?}"),
    }
}

#[test]
fn test_cli_ast() {
    match execute_check(&options("a=1", Mode::Ast)).unwrap() {
        CheckResult::Ast(json) => {
            assert_eq!(json["kind"], "ComparisonExpression");
            assert_eq!(json["right"]["value"], 1);
        }
        other => panic!("Expected AST, got {other:?}"),
    }
}

#[test]
fn test_cli_validate() {
    let valid = CheckOptions {
        schema: Some(SCHEMA.to_string()),
        ..options("givenName='x' and status in [1,2]", Mode::Validate)
    };
    assert!(matches!(
        execute_check(&valid).unwrap(),
        CheckResult::SchemaValid
    ));

    let invalid = CheckOptions {
        schema: Some(SCHEMA.to_string()),
        ..options(r#"gender>="M""#, Mode::Validate)
    };
    let err = execute_check(&invalid).unwrap_err();
    assert!(matches!(err, CliError::Validation(_)));
    assert!(err
        .to_string()
        .starts_with("Validation error: UNACCEPTED_FILTER_OPERATION"));
}

#[test]
fn test_cli_validate_needs_schema() {
    let err = execute_check(&options("a=1", Mode::Validate)).unwrap_err();
    assert!(matches!(err, CliError::NoSchema));

    let bad = CheckOptions {
        schema: Some("{ not json".to_string()),
        ..options("a=1", Mode::Validate)
    };
    assert!(matches!(execute_check(&bad).unwrap_err(), CliError::Schema(_)));
}

#[test]
fn test_cli_parse_limits() {
    let limited = CheckOptions {
        parse: ParseOptions::default().with_max_length(4),
        ..options("rate>=1", Mode::Check)
    };
    let err = execute_check(&limited).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parse error: filter is 7 bytes long, the limit is 4"
    );
}

// ============================================================================
// Documentation
// ============================================================================

#[test]
fn test_docs_overview_lists_categories() {
    let overview = get_docs_overview();
    for category in ["syntax", "operators", "literals", "validation"] {
        assert!(overview.contains(category), "{category}");
        assert!(get_doc_category(category).is_ok(), "{category}");
    }
}

#[test]
fn test_doc_categories() {
    assert!(get_doc_category("operators").unwrap().contains("!ilike"));
    assert!(get_doc_category("validation")
        .unwrap()
        .contains("UNACCEPTED_FILTER_OPERATION"));
    assert!(get_doc_category("Syntax").unwrap().starts_with("SYNTAX"));
    assert_eq!(DocCategory::from_name("schema"), Some(DocCategory::Validation));
    assert_eq!(DocCategory::from_name("nope"), None);
}

#[test]
fn test_unknown_doc_category() {
    let err = get_doc_category("plugins").unwrap_err();
    assert!(matches!(err, CliError::UnknownCategory(ref name) if name == "plugins"));
}

#[test]
fn test_doc_examples_are_accurate() {
    // The error shown in the syntax docs is the real one
    let err = parse("rate>=").unwrap_err();
    assert!(get_doc_category("syntax")
        .unwrap()
        .contains(&format!("Parse error: {err}")));
}
