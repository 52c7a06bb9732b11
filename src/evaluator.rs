use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime};
use log::trace;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use thiserror::Error;

use crate::{
    ast::{
        AstNode, ComparisonNode, ComparisonOperand, ComparisonOperator, LogicalOperator,
        UnaryOperator,
    },
    literal::{parse_date, parse_datetime},
    value::Value,
};

static NULL: Value = Value::Null;

/// Errors that can occur during filter evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Invalid operation for the given type
    #[error("Type error: {0}")]
    TypeError(String),

    /// Negating the smallest integer
    #[error("Integer overflow: cannot negate {0}")]
    Overflow(i64),
}

/// Applies a filter AST to in-memory records.
///
/// Missing properties resolve to `null`. Comparisons between values that
/// have no natural order (a string against a number, say) are simply
/// false, so a filter never fails because one record has an odd field.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates a node against a record.
    ///
    /// # Examples
    ///
    /// ```
    /// use cel_filter::{convert_to_ast, Evaluator, Value};
    /// use std::collections::HashMap;
    ///
    /// let mut alert = HashMap::new();
    /// alert.insert("severity".to_string(), Value::String("critical".to_string()));
    ///
    /// let ast = convert_to_ast("severity in ['critical', 'high']").unwrap();
    /// let result = Evaluator::new().evaluate(&ast, &Value::Object(alert)).unwrap();
    /// assert_eq!(result, Value::Boolean(true));
    /// ```
    pub fn evaluate(&self, node: &AstNode, record: &Value) -> Result<Value, EvalError> {
        match node {
            AstNode::PropertyAccess(p) => {
                Ok(record.lookup(&p.path).cloned().unwrap_or(Value::Null))
            }
            AstNode::Constant(c) => Ok(Value::from(&c.value)),
            AstNode::Comparison(c) => Ok(Value::Boolean(self.eval_comparison(c, record))),
            AstNode::Logical(l) => {
                let left = self.evaluate(&l.left, record)?.is_truthy();
                let result = match (l.operator, left) {
                    (LogicalOperator::And, false) => false,
                    (LogicalOperator::Or, true) => true,
                    _ => self.evaluate(&l.right, record)?.is_truthy(),
                };
                Ok(Value::Boolean(result))
            }
            AstNode::Unary(u) => match u.operator {
                UnaryOperator::Not => {
                    let operand = self.evaluate(&u.operand, record)?;
                    Ok(Value::Boolean(!operand.is_truthy()))
                }
                UnaryOperator::Neg => match self.evaluate(&u.operand, record)? {
                    Value::Integer(n) => n
                        .checked_neg()
                        .map(Value::Integer)
                        .ok_or(EvalError::Overflow(n)),
                    Value::Float(n) => Ok(Value::Float(-n)),
                    other => Err(EvalError::TypeError(format!(
                        "Cannot negate {}",
                        other.type_name()
                    ))),
                },
                UnaryOperator::Has => match &*u.operand {
                    AstNode::PropertyAccess(p) => {
                        Ok(Value::Boolean(record.lookup(&p.path).is_some()))
                    }
                    other => Err(EvalError::TypeError(format!(
                        "has() requires a property path, got {} node",
                        other.kind_name()
                    ))),
                },
            },
            AstNode::Parenthesis(p) => self.evaluate(&p.expression, record),
        }
    }

    /// Whether the record satisfies the filter.
    pub fn matches(&self, node: &AstNode, record: &Value) -> Result<bool, EvalError> {
        Ok(self.evaluate(node, record)?.is_truthy())
    }

    fn eval_comparison(&self, comparison: &ComparisonNode, record: &Value) -> bool {
        let left = record.lookup(&comparison.first_operand.path).unwrap_or(&NULL);

        let constant = match &comparison.second_operand {
            ComparisonOperand::List(items) => {
                return items
                    .iter()
                    .any(|item| values_equal(left, &Value::from(&item.value)));
            }
            ComparisonOperand::Constant(c) => &c.value,
        };
        let right = Value::from(constant);

        match comparison.operator {
            ComparisonOperator::Eq => values_equal(left, &right),
            ComparisonOperator::Ne => !values_equal(left, &right),
            ComparisonOperator::Gt => compare_values(left, &right) == Some(Ordering::Greater),
            ComparisonOperator::Ge => matches!(
                compare_values(left, &right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            ComparisonOperator::Lt => compare_values(left, &right) == Some(Ordering::Less),
            ComparisonOperator::Le => matches!(
                compare_values(left, &right),
                Some(Ordering::Less | Ordering::Equal)
            ),
            ComparisonOperator::Contains => match left {
                Value::String(s) => s.contains(&constant.text()),
                Value::Array(items) => items.iter().any(|item| values_equal(item, &right)),
                _ => false,
            },
            ComparisonOperator::StartsWith => match left {
                Value::String(s) => s.starts_with(&constant.text()),
                _ => false,
            },
            ComparisonOperator::EndsWith => match left {
                Value::String(s) => s.ends_with(&constant.text()),
                _ => false,
            },
            // Constructed only with a list operand
            ComparisonOperator::In => false,
        }
    }
}

/// `null` equals nothing, not even `null`.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Array(a), Value::Array(b)) => a == b,
        (Value::Object(a), Value::Object(b)) => a == b,
        _ => compare_values(left, right) == Some(Ordering::Equal),
    }
}

fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    let ordering = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Integer(a), Value::Float(b)) => compare_mixed(*a, *b),
        (Value::Float(a), Value::Integer(b)) => compare_mixed(*b, *a).map(Ordering::reverse),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::Date(_) | Value::DateTime(_), _) | (_, Value::Date(_) | Value::DateTime(_)) => {
            match (as_datetime(left), as_datetime(right)) {
                (Some(a), Some(b)) => Some(a.cmp(&b)),
                _ => None,
            }
        }
        _ => None,
    };

    if ordering.is_none() {
        trace!(
            "cannot compare {} with {}",
            left.type_name(),
            right.type_name()
        );
    }
    ordering
}

/// Compares an integer with a float exactly, falling back to `f64` when the
/// float has no decimal representation.
fn compare_mixed(int: i64, float: f64) -> Option<Ordering> {
    match Decimal::from_f64(float) {
        Some(fd) => Some(Decimal::from(int).cmp(&fd)),
        None => (int as f64).partial_cmp(&float),
    }
}

/// Dates become midnight; strings are read as ISO dates, datetimes, or
/// RFC 3339 timestamps (normalized to UTC).
fn as_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Date(d) => d.and_hms_opt(0, 0, 0),
        Value::DateTime(dt) => Some(*dt),
        Value::String(s) => parse_datetime(s)
            .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())),
        _ => None,
    }
}
