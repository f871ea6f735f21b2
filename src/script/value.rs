//! Dynamic values exchanged with scripting callers.

use serde::{Deserialize, Serialize};

/// A value passed to or returned from a scripted facade call.
///
/// Serialized untagged, so a JSON number, string or array of rows maps
/// directly onto a variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A plain number.
    Number(f64),
    /// A string (names, expressions, paths, markup).
    Text(String),
    /// A row-major matrix.
    Matrix(Vec<Vec<f64>>),
}

impl Value {
    /// Get the text, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the value as a non-negative count.
    ///
    /// Only finite, integral, non-negative numbers qualify.
    pub fn as_count(&self) -> Option<usize> {
        match *self {
            Self::Number(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 => {
                Some(n as usize)
            }
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}
