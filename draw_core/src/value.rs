//! Lenient numeric wire values.
//!
//! Front ends send numbers either as JSON numbers or as the text of a form
//! field (`"2.5"`). [`NumberLike`] accepts both and defers the conversion so
//! the caller decides whether a bad value is fatal or skippable.

use serde::{Deserialize, Serialize};

use crate::errors::{DrawError, DrawResult};

/// A JSON number or a string holding one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberLike {
    Number(f64),
    Text(String),
}

impl NumberLike {
    /// Finite numeric value, if the text parses
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            NumberLike::Number(n) => *n,
            NumberLike::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Numeric value or an InvalidInput error naming `field`
    pub fn require(&self, field: &str) -> DrawResult<f64> {
        self.as_f64()
            .ok_or_else(|| DrawError::invalid_input(field, self.to_string(), "Expected a number"))
    }
}

impl From<f64> for NumberLike {
    fn from(value: f64) -> Self {
        NumberLike::Number(value)
    }
}

impl std::fmt::Display for NumberLike {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberLike::Number(n) => write!(f, "{}", n),
            NumberLike::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Required numeric field: missing is MissingField, unparsable is InvalidInput.
pub fn required(value: Option<&NumberLike>, field: &str) -> DrawResult<f64> {
    value
        .ok_or_else(|| DrawError::missing_field(field))?
        .require(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_numbers_and_numeric_text() {
        let n: NumberLike = serde_json::from_str("12").unwrap();
        let t: NumberLike = serde_json::from_str("\" 2.5 \"").unwrap();
        assert_eq!(n.as_f64(), Some(12.0));
        assert_eq!(t.as_f64(), Some(2.5));
    }

    #[test]
    fn test_rejects_garbage_and_non_finite() {
        assert_eq!(NumberLike::Text("abc".into()).as_f64(), None);
        assert_eq!(NumberLike::Text("inf".into()).as_f64(), None);
        let err = NumberLike::Text("x".into()).require("carbon").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_required_reports_missing_field() {
        let err = required(None, "dies").unwrap_err();
        assert_eq!(err, DrawError::missing_field("dies"));
    }
}
