//! Literal type inference.
//!
//! Decides the semantic type of every literal from its surface syntax. The
//! rules run in a fixed order:
//!
//! 1. unquoted `true` / `false` → boolean
//! 2. unquoted digits → integer
//! 3. unquoted digits with one decimal point → float
//! 4. quoted three-letter weekday code (`MON`..`SUN`, any case) → string
//! 5. quoted `YYYY-MM-DD` that is a real calendar date → date
//! 6. quoted `YYYY-MM-DDTHH:MM:SS[.ffffff]` that is a real instant → datetime
//! 7. any other quoted text → string
//!
//! The interpreter has no state; the same literal always yields the same value.

use crate::{
    ast::{
        Constant,
        constant::{DATE_FORMAT, DATETIME_FORMAT},
    },
    lexer::Position,
};
use chrono::{NaiveDate, NaiveDateTime};
use log::trace;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Weekday codes that must never be read as dates.
const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("static date pattern"));

static DATETIME_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-5][0-9](\.[0-9]{1,6})?$")
        .expect("static datetime pattern")
});

/// A literal as it appeared in the filter text.
///
/// `text` is already escape-decoded for quoted literals. Negative numbers
/// keep their sign in `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLiteral {
    pub text: String,
    pub quoted: bool,
    pub position: Position,
}

impl RawLiteral {
    pub fn quoted(text: impl Into<String>, position: Position) -> Self {
        RawLiteral {
            text: text.into(),
            quoted: true,
            position,
        }
    }

    pub fn unquoted(text: impl Into<String>, position: Position) -> Self {
        RawLiteral {
            text: text.into(),
            quoted: false,
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("integer literal {0} does not fit in 64 bits")]
    IntegerOutOfRange(String),

    #[error("float literal {0} does not fit in 64 bits")]
    FloatOutOfRange(String),

    #[error("'{0}' is not a literal")]
    NotALiteral(String),
}

/// Infer the typed value of a literal.
pub fn interpret(raw: &RawLiteral) -> Result<Constant, LiteralError> {
    let constant = if raw.quoted {
        interpret_quoted(&raw.text)
    } else {
        interpret_unquoted(&raw.text)?
    };
    trace!(
        "literal {:?} (quoted: {}) -> {}",
        raw.text,
        raw.quoted,
        constant.type_name()
    );
    Ok(constant)
}

fn interpret_unquoted(text: &str) -> Result<Constant, LiteralError> {
    match text {
        "true" => return Ok(Constant::Boolean(true)),
        "false" => return Ok(Constant::Boolean(false)),
        _ => {}
    }

    let digits = text.strip_prefix('-').unwrap_or(text);
    match digits.split_once('.') {
        None if is_digits(digits) => text
            .parse::<i64>()
            .map(Constant::Integer)
            .map_err(|_| LiteralError::IntegerOutOfRange(text.to_string())),
        Some((whole, fraction)) if is_digits(whole) && is_digits(fraction) => {
            match text.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Constant::Float(n)),
                Ok(_) => Err(LiteralError::FloatOutOfRange(text.to_string())),
                Err(_) => Err(LiteralError::NotALiteral(text.to_string())),
            }
        }
        _ => Err(LiteralError::NotALiteral(text.to_string())),
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn interpret_quoted(text: &str) -> Constant {
    if is_weekday_abbreviation(text) {
        return Constant::String(text.to_string());
    }
    if let Some(date) = parse_date(text) {
        return Constant::Date(date);
    }
    if let Some(datetime) = parse_datetime(text) {
        return Constant::DateTime(datetime);
    }
    Constant::String(text.to_string())
}

pub fn is_weekday_abbreviation(text: &str) -> bool {
    text.len() == 3
        && WEEKDAY_ABBREVIATIONS
            .iter()
            .any(|day| day.eq_ignore_ascii_case(text))
}

/// Parse `YYYY-MM-DD`, rejecting impossible calendar dates.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if !DATE_SHAPE.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Parse `YYYY-MM-DDTHH:MM:SS` with up to six fractional digits. Leap
/// seconds are not accepted.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if !DATETIME_SHAPE.is_match(text) {
        return None;
    }
    let format = if text.contains('.') {
        DATETIME_FORMAT
    } else {
        "%Y-%m-%dT%H:%M:%S"
    };
    NaiveDateTime::parse_from_str(text, format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted(text: &str) -> Constant {
        interpret(&RawLiteral::quoted(text, Position::default())).unwrap()
    }

    fn unquoted(text: &str) -> Result<Constant, LiteralError> {
        interpret(&RawLiteral::unquoted(text, Position::default()))
    }

    #[test]
    fn test_weekday_codes_stay_strings() {
        for day in ["MON", "tue", "Wed", "thu", "FRI", "sat", "Sun"] {
            assert_eq!(quoted(day), Constant::String(day.to_string()));
        }
    }

    #[test]
    fn test_quoted_digits_stay_strings() {
        assert_eq!(quoted("123"), Constant::String("123".to_string()));
        assert_eq!(quoted("true"), Constant::String("true".to_string()));
    }

    #[test]
    fn test_invalid_calendar_date_is_string() {
        assert_eq!(quoted("2025-02-30"), Constant::String("2025-02-30".to_string()));
        assert_eq!(quoted("2025-13-01"), Constant::String("2025-13-01".to_string()));
    }

    #[test]
    fn test_date_with_trailing_content_is_string() {
        assert_eq!(
            quoted("2025-01-20 extra"),
            Constant::String("2025-01-20 extra".to_string())
        );
        assert_eq!(
            quoted("2025-01-20T14:35:27.1234567"),
            Constant::String("2025-01-20T14:35:27.1234567".to_string())
        );
    }

    #[test]
    fn test_negative_numbers() {
        assert_eq!(unquoted("-42"), Ok(Constant::Integer(-42)));
        assert_eq!(unquoted("-0.5"), Ok(Constant::Float(-0.5)));
    }

    #[test]
    fn test_integer_overflow() {
        assert!(matches!(
            unquoted("99999999999999999999"),
            Err(LiteralError::IntegerOutOfRange(_))
        ));
    }

    #[test]
    fn test_identifier_is_not_a_literal() {
        assert!(matches!(unquoted("severity"), Err(LiteralError::NotALiteral(_))));
        assert!(matches!(unquoted("1.2.3"), Err(LiteralError::NotALiteral(_))));
    }
}
