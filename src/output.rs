//! JSON rendering of filter ASTs.
//!
//! Tools that do not link against this crate (UIs, query generators in other
//! languages) consume the tree as JSON. Every node is an object tagged with
//! `"type"`; constants also carry `"value_type"` so integers, floats and
//! dates survive the trip.
//!
//! # Examples
//!
//! ```
//! use cel_filter::convert_to_ast;
//! use cel_filter::output::to_json;
//!
//! let ast = convert_to_ast("count > 5").unwrap();
//! assert_eq!(
//!     to_json(&ast),
//!     r#"{"first_operand":{"path":["count"],"type":"property_access"},"operator":"GT","second_operand":{"type":"constant","value":5,"value_type":"integer"},"type":"comparison"}"#
//! );
//! ```

use serde_json::{Value as Json, json};

use crate::ast::{AstNode, ComparisonOperand, Constant, ConstantNode, PropertyAccessNode};

/// Builds the JSON document for a node.
pub fn ast_to_json(node: &AstNode) -> Json {
    match node {
        AstNode::PropertyAccess(p) => property_json(p),
        AstNode::Constant(c) => constant_json(c),
        AstNode::Comparison(c) => {
            let second = match &c.second_operand {
                ComparisonOperand::Constant(constant) => constant_json(constant),
                ComparisonOperand::List(items) => {
                    Json::Array(items.iter().map(constant_json).collect())
                }
            };
            json!({
                "type": node.kind_name(),
                "operator": c.operator.as_str(),
                "first_operand": property_json(&c.first_operand),
                "second_operand": second,
            })
        }
        AstNode::Logical(l) => json!({
            "type": node.kind_name(),
            "operator": l.operator.as_str(),
            "left": ast_to_json(&l.left),
            "right": ast_to_json(&l.right),
        }),
        AstNode::Unary(u) => json!({
            "type": node.kind_name(),
            "operator": u.operator.as_str(),
            "operand": ast_to_json(&u.operand),
        }),
        AstNode::Parenthesis(p) => json!({
            "type": node.kind_name(),
            "expression": ast_to_json(&p.expression),
        }),
    }
}

fn property_json(node: &PropertyAccessNode) -> Json {
    json!({ "type": "property_access", "path": node.path })
}

fn constant_json(node: &ConstantNode) -> Json {
    let value = match &node.value {
        Constant::Boolean(b) => json!(b),
        Constant::Integer(n) => json!(n),
        // Non-finite floats cannot come out of the parser
        Constant::Float(n) => serde_json::Number::from_f64(*n)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Constant::String(s) => json!(s),
        Constant::Date(_) | Constant::DateTime(_) => json!(node.value.text()),
    };
    json!({
        "type": "constant",
        "value_type": node.value.type_name(),
        "value": value,
    })
}

/// Converts an AST to a compact JSON string.
///
/// Object keys come out sorted, so the output is deterministic.
pub fn to_json(node: &AstNode) -> String {
    ast_to_json(node).to_string()
}

/// Converts an AST to a pretty-printed JSON string with 2-space indentation.
pub fn to_json_pretty(node: &AstNode) -> String {
    // Serializing a `serde_json::Value` to a String cannot fail
    serde_json::to_string_pretty(&ast_to_json(node)).unwrap_or_default()
}
