use std::fmt;

use serde::{Deserialize, Serialize};

/// A single candidate value for a parameter.
///
/// Integers cover both plain numeric settings and layer counts; tokens are
/// bare strings such as `same` or `K562` written without quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Token(String),
}

impl ParamValue {
    /// Interpret the value as a layer count.
    ///
    /// Returns `None` for floats, tokens, and negative integers.
    pub fn as_count(&self) -> Option<usize> {
        match self {
            ParamValue::Int(n) => usize::try_from(*n).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(n) => write!(f, "{}", n),
            // Keep whole floats distinguishable from integers (0.5 -> "0.5", 2.0 -> "2.0").
            ParamValue::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Token(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Token(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_natural_forms() {
        assert_eq!(ParamValue::Int(128).to_string(), "128");
        assert_eq!(ParamValue::Float(0.002).to_string(), "0.002");
        assert_eq!(ParamValue::Float(0.5).to_string(), "0.5");
        assert_eq!(ParamValue::Float(2.0).to_string(), "2.0");
        assert_eq!(ParamValue::from("same").to_string(), "same");
    }

    #[test]
    fn test_as_count() {
        assert_eq!(ParamValue::Int(3).as_count(), Some(3));
        assert_eq!(ParamValue::Int(0).as_count(), Some(0));
        assert_eq!(ParamValue::Int(-1).as_count(), None);
        assert_eq!(ParamValue::Float(3.0).as_count(), None);
        assert_eq!(ParamValue::from("3").as_count(), None);
    }

    #[test]
    fn test_untagged_json_values() {
        let values: Vec<ParamValue> = serde_json::from_str(r#"[128, 0.5, "same"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                ParamValue::Int(128),
                ParamValue::Float(0.5),
                ParamValue::Token("same".to_string())
            ]
        );
    }
}
