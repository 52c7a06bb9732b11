// tests/parser_tests.rs

use cel_filter::ast::{
    AstNode, ComparisonOperand, ComparisonOperator, Constant, ConstantNode, LogicalOperator,
    PropertyAccessNode, UnaryOperator,
};
use cel_filter::literal::LiteralError;
use cel_filter::{ErrorKind, ParseError, convert_to_ast};
use chrono::NaiveDate;

fn comparison(input: &str) -> (ComparisonOperator, Vec<String>, ComparisonOperand) {
    match convert_to_ast(input).unwrap() {
        AstNode::Comparison(c) => (c.operator, c.first_operand.path, c.second_operand),
        other => panic!("Expected comparison for {}, got {:?}", input, other),
    }
}

fn scalar(input: &str) -> (ComparisonOperator, Vec<String>, Constant) {
    match comparison(input) {
        (op, path, ComparisonOperand::Constant(c)) => (op, path, c.value),
        (_, _, other) => panic!("Expected constant operand for {}, got {:?}", input, other),
    }
}

fn path(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|s| s.to_string()).collect()
}

fn string(s: &str) -> Constant {
    Constant::String(s.to_string())
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_all_comparison_operators() {
    let test_cases = vec![
        ("fakeProp == 'fake alert'", ComparisonOperator::Eq),
        ("fakeProp != 'fake alert'", ComparisonOperator::Ne),
        ("fakeProp > 'fake alert'", ComparisonOperator::Gt),
        ("fakeProp >= 'fake alert'", ComparisonOperator::Ge),
        ("fakeProp < 'fake alert'", ComparisonOperator::Lt),
        ("fakeProp <= 'fake alert'", ComparisonOperator::Le),
    ];

    for (input, expected) in test_cases {
        let (op, p, value) = scalar(input);
        assert_eq!(op, expected, "Failed for input: {}", input);
        assert_eq!(p, path(&["fakeProp"]));
        assert_eq!(value, string("fake alert"));
    }
}

#[test]
fn test_compact_spacing() {
    let (op, p, value) = scalar("object.property.path=='fake alert'");
    assert_eq!(op, ComparisonOperator::Eq);
    assert_eq!(p, path(&["object", "property", "path"]));
    assert_eq!(value, string("fake alert"));
}

// ============================================================================
// Property Paths
// ============================================================================

#[test]
fn test_mixed_bracket_and_dot_path() {
    let (_, p, value) =
        scalar("labels['previous_test_name-1'].tag.newPath['123456']=='fake alert'");
    assert_eq!(
        p,
        path(&["labels", "previous_test_name-1", "tag", "newPath", "123456"])
    );
    assert_eq!(value, string("fake alert"));
}

#[test]
fn test_bracket_and_dot_forms_are_equivalent() {
    let bracketed = convert_to_ast("labels['a'].b['c'] == 1").unwrap();
    let dotted = convert_to_ast("labels.a.b.c == 1").unwrap();
    let double_quoted = convert_to_ast(r#"labels["a"]["b"].c == 1"#).unwrap();
    assert_eq!(bracketed, dotted);
    assert_eq!(bracketed, double_quoted);
}

#[test]
fn test_numeric_bracket_key() {
    let (_, p, _) = scalar("tags[2] == 'x'");
    assert_eq!(p, path(&["tags", "2"]));
}

#[test]
fn test_bare_property() {
    assert_eq!(
        convert_to_ast("acknowledged").unwrap(),
        AstNode::property(["acknowledged"])
    );
}

#[test]
fn test_identifier_key_in_brackets_is_rejected() {
    let err = convert_to_ast("labels[team] == 'x'").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

// ============================================================================
// Literal Inference Through the Parser
// ============================================================================

#[test]
fn test_escaped_quotes() {
    assert_eq!(
        scalar(r"fakeProp == 'It\'s value with escaped single-quote'").2,
        string("It's value with escaped single-quote")
    );
    assert_eq!(
        scalar(r#"fakeProp == "It\"s value with escaped double-quote""#).2,
        string("It\"s value with escaped double-quote")
    );
}

#[test]
fn test_boolean_integer_float() {
    assert_eq!(scalar("fakeProp == true").2, Constant::Boolean(true));
    assert_eq!(scalar("fakeProp == false").2, Constant::Boolean(false));
    assert_eq!(scalar("fakeProp == 12349983").2, Constant::Integer(12349983));
    assert_eq!(scalar("fakeProp == 1234.9983").2, Constant::Float(1234.9983));
}

#[test]
fn test_negative_numbers() {
    assert_eq!(scalar("fakeProp > -5").2, Constant::Integer(-5));
    assert_eq!(scalar("fakeProp > -0.25").2, Constant::Float(-0.25));
}

#[test]
fn test_weekday_codes_are_strings() {
    assert_eq!(scalar("fakeProp == 'MON'").2, string("MON"));
    assert_eq!(scalar("fakeProp == 'mon'").2, string("mon"));
}

#[test]
fn test_date_and_datetime() {
    assert_eq!(
        scalar("fakeProp == '2025-01-20'").2,
        Constant::Date(NaiveDate::from_ymd_opt(2025, 1, 20).unwrap())
    );
    assert_eq!(
        scalar("fakeProp == '2025-01-20T14:35:27.123456'").2,
        Constant::DateTime(
            NaiveDate::from_ymd_opt(2025, 1, 20)
                .unwrap()
                .and_hms_micro_opt(14, 35, 27, 123456)
                .unwrap()
        )
    );
    assert_eq!(
        scalar("fakeProp == '2025-01-20T14:35:27'").2,
        Constant::DateTime(
            NaiveDate::from_ymd_opt(2025, 1, 20)
                .unwrap()
                .and_hms_opt(14, 35, 27)
                .unwrap()
        )
    );
}

#[test]
fn test_float_out_of_range_is_unsupported() {
    let input = format!("x == {}.5", "9".repeat(400));
    let err = convert_to_ast(&input).unwrap_err();
    assert!(matches!(
        err,
        ParseError::Literal {
            source: LiteralError::FloatOutOfRange(_),
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::UnsupportedExpression);
}

#[test]
fn test_leap_second_stays_string() {
    assert_eq!(
        scalar("fakeProp == '2025-01-20T14:35:60'").2,
        string("2025-01-20T14:35:60")
    );
}

#[test]
fn test_integer_out_of_range_is_unsupported() {
    let err = convert_to_ast("count == 92233720368547758070").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedExpression);
}

// ============================================================================
// Method-Style Predicates
// ============================================================================

#[test]
fn test_string_predicates() {
    let test_cases = vec![
        (r"fakeProp.contains('\'±CPU±\'')", ComparisonOperator::Contains),
        (r"fakeProp.startsWith('\'±CPU±\'')", ComparisonOperator::StartsWith),
        (r"fakeProp.endsWith('\'±CPU±\'')", ComparisonOperator::EndsWith),
    ];

    for (input, expected) in test_cases {
        let (op, p, value) = scalar(input);
        assert_eq!(op, expected, "Failed for input: {}", input);
        assert_eq!(p, path(&["fakeProp"]));
        assert_eq!(value, string("'±CPU±'"));
    }
}

#[test]
fn test_predicate_on_nested_path() {
    let (op, p, value) = scalar("labels['host-name'].startsWith(\"db\")");
    assert_eq!(op, ComparisonOperator::StartsWith);
    assert_eq!(p, path(&["labels", "host-name"]));
    assert_eq!(value, string("db"));
}

#[test]
fn test_unknown_method_is_syntax_error() {
    let err = convert_to_ast("fakeProp.sparkles('x')").unwrap_err();
    assert!(matches!(err, ParseError::UnknownFunction { ref name, .. } if name == "sparkles"));
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn test_cel_macro_is_unsupported() {
    let err = convert_to_ast("tags.exists(t, t == 'x')").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedExpression);
    let err = convert_to_ast("size(tags) > 2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedExpression);
}

#[test]
fn test_predicates_do_not_chain() {
    assert!(convert_to_ast("name.contains('a').contains('b')").is_err());
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn test_in_list_preserves_order_and_types() {
    let (op, p, operand) = comparison("fakeProp in ['string', 12345, true]");
    assert_eq!(op, ComparisonOperator::In);
    assert_eq!(p, path(&["fakeProp"]));
    assert_eq!(
        operand,
        ComparisonOperand::List(vec![
            ConstantNode::new(string("string")),
            ConstantNode::new(Constant::Integer(12345)),
            ConstantNode::new(Constant::Boolean(true)),
        ])
    );
}

#[test]
fn test_in_list_keeps_duplicates() {
    match comparison("x in [1, 1, 2,]").2 {
        ComparisonOperand::List(items) => assert_eq!(items.len(), 3),
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_empty_in_list() {
    assert_eq!(comparison("x in []").2, ComparisonOperand::List(vec![]));
}

#[test]
fn test_in_without_list_is_unsupported() {
    let err = convert_to_ast("x in y").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedExpression);
}

// ============================================================================
// Unary, Logical and Grouping
// ============================================================================

#[test]
fn test_unary_operators() {
    let test_cases = vec![
        ("!fakeProp", UnaryOperator::Not),
        ("-fakeProp", UnaryOperator::Neg),
        ("has(fakeProp)", UnaryOperator::Has),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            convert_to_ast(input).unwrap(),
            AstNode::unary(expected, AstNode::property(["fakeProp"])),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_has_with_nested_path() {
    assert_eq!(
        convert_to_ast("has(labels['team'].owner)").unwrap(),
        AstNode::unary(
            UnaryOperator::Has,
            AstNode::property(["labels", "team", "owner"])
        )
    );
}

#[test]
fn test_has_requires_path() {
    assert!(convert_to_ast("has('x')").is_err());
}

#[test]
fn test_logical_nodes() {
    let test_cases = vec![
        ("!firstFakeProp && !secondFakeProp", LogicalOperator::And),
        ("!firstFakeProp || !secondFakeProp", LogicalOperator::Or),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            convert_to_ast(input).unwrap(),
            AstNode::logical(
                expected,
                AstNode::unary(UnaryOperator::Not, AstNode::property(["firstFakeProp"])),
                AstNode::unary(UnaryOperator::Not, AstNode::property(["secondFakeProp"])),
            ),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_logical_chains_nest_left() {
    let a = AstNode::property(["a"]);
    let b = AstNode::property(["b"]);
    let c = AstNode::property(["c"]);
    assert_eq!(
        convert_to_ast("a && b && c").unwrap(),
        AstNode::logical(
            LogicalOperator::And,
            AstNode::logical(LogicalOperator::And, a, b),
            c
        )
    );
}

#[test]
fn test_or_binds_loosest() {
    match convert_to_ast("a == 1 || b == 2 && c == 3").unwrap() {
        AstNode::Logical(l) => {
            assert_eq!(l.operator, LogicalOperator::Or);
            assert!(matches!(*l.left, AstNode::Comparison(_)));
            assert!(matches!(
                *l.right,
                AstNode::Logical(ref inner) if inner.operator == LogicalOperator::And
            ));
        }
        other => panic!("Expected OR, got {:?}", other),
    }
}

#[test]
fn test_parenthesized_unary_operand() {
    let test_cases = vec![
        ("!(fakeProp)", UnaryOperator::Not),
        ("-(fakeProp)", UnaryOperator::Neg),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            convert_to_ast(input).unwrap(),
            AstNode::unary(
                expected,
                AstNode::parenthesis(AstNode::property(["fakeProp"]))
            ),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_negated_group_of_logical() {
    match convert_to_ast("!(a == 1 || b == 2)").unwrap() {
        AstNode::Unary(u) => match *u.operand {
            AstNode::Parenthesis(p) => assert!(matches!(*p.expression, AstNode::Logical(_))),
            other => panic!("Expected parenthesis, got {:?}", other),
        },
        other => panic!("Expected unary, got {:?}", other),
    }
}

#[test]
fn test_plain_group_is_not_wrapped() {
    let grouped = convert_to_ast("(a == 1 || b == 2) && c == 3").unwrap();
    match grouped {
        AstNode::Logical(l) => {
            assert_eq!(l.operator, LogicalOperator::And);
            assert!(matches!(
                *l.left,
                AstNode::Logical(ref inner) if inner.operator == LogicalOperator::Or
            ));
        }
        other => panic!("Expected AND, got {:?}", other),
    }
}

#[test]
fn test_comparison_first_operand_is_property() {
    match convert_to_ast("a.b >= 3").unwrap() {
        AstNode::Comparison(c) => {
            assert_eq!(c.first_operand, PropertyAccessNode::new(["a", "b"]));
        }
        other => panic!("Expected comparison, got {:?}", other),
    }
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_parsing_is_deterministic() {
    let input = "severity in ['critical', 'high'] && !(acked) || created > '2025-01-20'";
    assert_eq!(convert_to_ast(input).unwrap(), convert_to_ast(input).unwrap());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_unmatched_paren() {
    let err = convert_to_ast("(fakeProp == 'x'").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn test_unmatched_bracket() {
    let err = convert_to_ast("labels['a' == 'x'").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn test_dangling_operator() {
    for input in ["fakeProp ==", "a == 1 &&", "a ||", "!", "x in"] {
        let err = convert_to_ast(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax, "Failed for input: {}", input);
    }
}

#[test]
fn test_unterminated_string() {
    let err = convert_to_ast("fakeProp == 'open").unwrap_err();
    assert!(matches!(err, ParseError::Lex(_)));
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn test_empty_input() {
    assert_eq!(convert_to_ast("").unwrap_err().kind(), ErrorKind::Syntax);
}

#[test]
fn test_arithmetic_is_unsupported() {
    for input in ["a + 1 == 2", "a == 1 - 2", "a * 2", "a ? b : c", "a == {'k': 1}"] {
        let err = convert_to_ast(input).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::UnsupportedExpression,
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_arithmetic_in_lists_and_arguments_is_unsupported() {
    let test_cases = vec![
        "x in [1 + 2]",
        "x in ['a', 2 * 3]",
        "name.contains('x' + 'y')",
        "name.startsWith('x' ? 'y' : 'z')",
    ];

    for input in test_cases {
        let err = convert_to_ast(input).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::UnsupportedExpression,
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_malformed_list_is_syntax_error() {
    for input in ["x in [1 2]", "x in [1,, 2]", "name.contains('a' 'b')"] {
        let err = convert_to_ast(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax, "Failed for input: {}", input);
    }
}

#[test]
fn test_literal_on_left_is_unsupported() {
    let err = convert_to_ast("'x' == fakeProp").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedExpression);
}

#[test]
fn test_error_reports_position() {
    let err = convert_to_ast("a == 1 &&\n  == 2").unwrap_err();
    let position = err.position();
    assert_eq!(position.line, 2);
    assert_eq!(position.column, 3);
}
