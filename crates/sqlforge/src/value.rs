//! Typed values carried between records, clauses, and bound-parameter lists.
//!
//! A [`Value`] is the raw typed form of one record attribute or condition
//! operand. Literal mode renders it inline via [`Value::literal`]; in
//! parameterized mode the raw value travels on the bound-value list instead
//! and the generated SQL carries a `?` placeholder.

use chrono::NaiveDateTime;
use std::fmt;

/// Timestamp rendering used everywhere in generated SQL.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A typed SQL value.
///
/// Only the three kinds the assembler maps are representable; record
/// attributes of any other type never produce a `Value` and are dropped
/// during introspection.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text, single-quote wrapped in literal mode (no further escaping:
    /// callers requiring injection safety must use parameterized mode).
    Text(String),
    /// Integer, decimal-rendered.
    Int(i64),
    /// Timestamp, formatted `YYYY-MM-DD HH:MM:SS` and quote wrapped.
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Render the literal textual form used when a statement is in literal mode.
    pub fn literal(&self) -> String {
        match self {
            Value::Text(s) => format!("'{s}'"),
            Value::Int(n) => n.to_string(),
            Value::Timestamp(t) => format!("'{}'", t.format(DATETIME_FORMAT)),
        }
    }
}

/// Raw (unquoted) form, used for debug logging of bound-value lists.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            Value::Timestamp(t) => write!(f, "{}", t.format(DATETIME_FORMAT)),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(t: NaiveDateTime) -> Self {
        Value::Timestamp(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn text_literal_is_quote_wrapped() {
        assert_eq!(Value::from("Mike").literal(), "'Mike'");
        // No escaping beyond the wrap; parameterized mode is the safe path.
        assert_eq!(Value::from("O'Brien").literal(), "'O'Brien'");
    }

    #[test]
    fn int_literal_is_decimal() {
        assert_eq!(Value::from(18).literal(), "18");
        assert_eq!(Value::from(-5i64).literal(), "-5");
    }

    #[test]
    fn timestamp_literal_is_formatted_and_quoted() {
        let t = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap();
        assert_eq!(Value::from(t).literal(), "'2024-03-01 09:30:05'");
    }

    #[test]
    fn display_renders_raw_form() {
        assert_eq!(Value::from("Mike").to_string(), "Mike");
        assert_eq!(Value::from(18).to_string(), "18");
    }
}
