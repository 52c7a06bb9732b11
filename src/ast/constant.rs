use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Typed literal value carried by a [`ConstantNode`](crate::ast::ConstantNode).
///
/// Exactly one variant is chosen per literal by the literal interpreter.
/// Integers and floats stay distinct so code generators can pick the right
/// cast, and quoted calendar values are tagged as dates.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Constant {
    /// Name of the semantic type, as used in JSON output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Constant::Boolean(_) => "boolean",
            Constant::Integer(_) => "integer",
            Constant::Float(_) => "float",
            Constant::String(_) => "string",
            Constant::Date(_) => "date",
            Constant::DateTime(_) => "datetime",
        }
    }

    /// Unquoted text form, used by the substring predicates.
    pub fn text(&self) -> String {
        match self {
            Constant::String(s) => s.clone(),
            Constant::Date(d) => d.format(DATE_FORMAT).to_string(),
            Constant::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
            other => other.to_string(),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("'")
}

/// Renders the constant as a CEL literal that reparses to the same value.
impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Boolean(b) => write!(f, "{}", b),
            Constant::Integer(n) => write!(f, "{}", n),
            Constant::Float(n) => {
                let text = n.to_string();
                if text.contains('.') {
                    f.write_str(&text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
            Constant::String(s) => write_quoted(f, s),
            Constant::Date(_) | Constant::DateTime(_) => write_quoted(f, &self.text()),
        }
    }
}
