//! Numeric coercion and display formatting
//!
//! The API hands back decimals as JSON numbers on some endpoints and as strings on
//! others. Everything that turns a wire value into a number, or a number into display
//! text, goes through here.

use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

/// Parse a number out of a JSON value that may be a number or a numeric string.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_f64(s),
        _ => None,
    }
}

/// Parse a decimal string, tolerating surrounding whitespace.
pub fn parse_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Deserialize an `f64` from either a JSON number or a numeric string.
pub fn de_f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_f64(&value).ok_or_else(|| D::Error::custom(format!("expected a number, got {value}")))
}

/// Like [`de_f64_lenient`] but `null` maps to `None`.
pub fn de_opt_f64_lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => coerce_f64(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a number, got {value}"))),
    }
}

/// Deserialize text that may arrive as a string, a number or `null`.
///
/// `null` becomes the empty string so matching code never has to special-case it.
pub fn de_string_lenient<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("expected text, got {other}"))),
    }
}

/// Two-decimal display formatting with a configurable decimal separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalFormat {
    separator: char,
}

impl Default for DecimalFormat {
    fn default() -> Self {
        Self { separator: '.' }
    }
}

impl DecimalFormat {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn format(&self, value: f64) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        let text = format!("{:.2}", value);
        if self.separator == '.' {
            text
        } else {
            text.replacen('.', &self.separator.to_string(), 1)
        }
    }

    /// Format a string-encoded decimal; unparseable input renders as zero.
    pub fn format_str(&self, raw: &str) -> String {
        self.format(parse_f64(raw).unwrap_or(0.0))
    }

    /// Zero in this format, used as the placeholder for missing values.
    pub fn zero(&self) -> String {
        self.format(0.0)
    }
}
