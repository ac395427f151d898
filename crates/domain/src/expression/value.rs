//! Runtime values of expression evaluation

use std::fmt;

/// A value produced while evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A floating point number.
    Number(f64),
    /// Free text.
    Text(String),
}

impl Value {
    /// Interprets the raw value of a variable: text that parses as a finite
    /// number (after trimming) is a number, anything else stays text.
    #[must_use]
    pub fn from_variable(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(raw.to_string()),
        }
    }

    /// Renders the value as it is stored in a resolved holder.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
        }
    }

    /// Returns the number if this is a numeric value.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Formats a number with at least one decimal place.
///
/// Integral values keep a trailing `.0` (`5.0`), other values use the
/// shortest representation that round-trips (`2.5`). Negative zero is
/// rendered as `0.0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0.0".to_string();
    }
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
