//! Template processor settings

use serde::{Deserialize, Serialize};

/// Character separating a source qualifier from the variable name.
pub const DEFAULT_QUALIFIER_SEPARATOR: char = '.';

/// Settings for a [`TemplateProcessor`](crate::TemplateProcessor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorSettings {
    /// Splits `source<sep>name` placeholders. Only the first occurrence counts.
    pub qualifier_separator: char,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            qualifier_separator: DEFAULT_QUALIFIER_SEPARATOR,
        }
    }
}
