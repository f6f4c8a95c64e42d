//! Runtime values of the expression interpreter.

use std::cmp::Ordering;
use std::fmt;

use dds_common::{finite, format_number, parse_number};
use dds_model::CellValue;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    #[default]
    Null,
}

impl Value {
    /// Wraps a computed number; non-finite results become `Null`.
    pub fn number(value: f64) -> Value {
        finite(value).map_or(Value::Null, Value::Number)
    }

    pub fn from_cell(cell: &CellValue) -> Value {
        match cell {
            CellValue::Number(value) => Value::number(*value),
            CellValue::Text(text) if text.trim().is_empty() => Value::Null,
            CellValue::Text(text) => Value::Text(text.clone()),
            CellValue::Empty => Value::Null,
        }
    }

    /// Converts a result into a table cell.
    ///
    /// Booleans are stored as the text `true` / `false`; `Null` becomes an
    /// empty cell.
    pub fn into_cell(self) -> CellValue {
        match self {
            Value::Number(value) => CellValue::Number(value),
            Value::Text(text) => CellValue::Text(text),
            Value::Bool(flag) => CellValue::Text(flag.to_string()),
            Value::Null => CellValue::Empty,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric reading. Text goes through the locale-aware number rule;
    /// booleans read as 1 and 0.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => finite(*value),
            Value::Text(text) => parse_number(text),
            Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            Value::Null => None,
        }
    }

    /// Text reading. `Null` reads as the empty string.
    pub fn as_text(&self) -> String {
        match self {
            Value::Number(value) => format_number(*value),
            Value::Text(text) => text.clone(),
            Value::Bool(flag) => flag.to_string(),
            Value::Null => String::new(),
        }
    }

    /// Truthiness for conditions: non-zero numbers, non-blank text and `true`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(value) => *value != 0.0,
            Value::Text(text) => !text.trim().is_empty(),
            Value::Bool(flag) => *flag,
            Value::Null => false,
        }
    }

    /// Orders two non-null values. Numbers compare numerically when both
    /// sides read as numbers, otherwise the text forms are compared.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        if self.is_null() || other.is_null() {
            return None;
        }
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => Some(self.as_text().cmp(&other.as_text())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            other => f.write_str(&other.as_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cell() {
        assert_eq!(Value::from_cell(&CellValue::Empty), Value::Null);
        assert_eq!(
            Value::from_cell(&CellValue::Text("  ".to_string())),
            Value::Null
        );
        assert_eq!(
            Value::from_cell(&CellValue::Number(f64::INFINITY)),
            Value::Null
        );
        assert_eq!(
            Value::from_cell(&CellValue::Text("x".to_string())),
            Value::Text("x".to_string())
        );
    }

    #[test]
    fn test_into_cell() {
        assert_eq!(Value::Bool(true).into_cell(), CellValue::Text("true".to_string()));
        assert_eq!(Value::Null.into_cell(), CellValue::Empty);
        assert_eq!(Value::Number(2.0).into_cell(), CellValue::Number(2.0));
    }

    #[test]
    fn test_coercion() {
        assert_eq!(Value::Text("1.200".to_string()).as_number(), Some(1200.0));
        assert_eq!(Value::Text("abc".to_string()).as_number(), None);
        assert_eq!(Value::Bool(true).as_number(), Some(1.0));
        assert_eq!(Value::Number(2.5).as_text(), "2.5");
        assert_eq!(Value::number(f64::NAN), Value::Null);
    }

    #[test]
    fn test_compare() {
        let ten = Value::Number(10.0);
        let nine_text = Value::Text("9".to_string());
        assert_eq!(ten.compare(&nine_text), Some(Ordering::Greater));
        let apple = Value::Text("apple".to_string());
        let banana = Value::Text("banana".to_string());
        assert_eq!(apple.compare(&banana), Some(Ordering::Less));
        assert_eq!(apple.compare(&Value::Null), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::Number(-1.0).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Text(" ".to_string()).is_truthy());
        assert!(!Value::Null.is_truthy());
    }
}
