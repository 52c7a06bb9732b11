use crate::ast::Constant;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// A record value the evaluator matches filters against.
///
/// This type represents all JSON types, keeps integers and floats apart,
/// and adds calendar values so date constants have something to compare
/// with.
///
/// # Examples
///
/// ```
/// use cel_filter::Value;
/// use std::collections::HashMap;
///
/// let mut labels = HashMap::new();
/// labels.insert("team".to_string(), Value::String("db".to_string()));
///
/// let mut alert = HashMap::new();
/// alert.insert("count".to_string(), Value::Integer(3));
/// alert.insert("labels".to_string(), Value::Object(labels));
/// let record = Value::Object(alert);
///
/// assert_eq!(
///     record.lookup(&["labels", "team"]),
///     Some(&Value::String("db".to_string()))
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing field or JSON null
    Null,

    Boolean(bool),

    /// Non-integral JSON number
    Float(f64),

    /// JSON number that fits in `i64`
    Integer(i64),

    String(String),

    /// Calendar date
    Date(NaiveDate),

    /// Date and time of day, no timezone
    DateTime(NaiveDateTime),

    /// JSON array, indexed by numeric path segments
    Array(Vec<Value>),

    /// Object with string keys
    Object(HashMap<String, Value>),
}

impl Value {
    /// Truthiness used by `&&`, `||` and `!`
    pub fn is_truthy(&self) -> bool {
        use Value::*;
        match self {
            Null => false,
            Boolean(b) => *b,
            Float(n) => *n != 0.0,
            Integer(n) => *n != 0,
            String(s) => !s.is_empty(),
            Date(_) | DateTime(_) => true,
            Array(arr) => !arr.is_empty(),
            Object(obj) => !obj.is_empty(),
        }
    }

    /// Human-readable type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Look up a property path. Objects are indexed by key, arrays by a
    /// numeric segment.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        path.iter().try_fold(self, |current, segment| {
            let segment = segment.as_ref();
            match current {
                Value::Object(map) => map.get(segment),
                Value::Array(arr) => segment.parse::<usize>().ok().and_then(|i| arr.get(i)),
                _ => None,
            }
        })
    }
}

impl From<&Constant> for Value {
    fn from(constant: &Constant) -> Self {
        match constant {
            Constant::Boolean(b) => Value::Boolean(*b),
            Constant::Integer(n) => Value::Integer(*n),
            Constant::Float(n) => Value::Float(*n),
            Constant::String(s) => Value::String(s.clone()),
            Constant::Date(d) => Value::Date(*d),
            Constant::DateTime(dt) => Value::DateTime(*dt),
        }
    }
}
