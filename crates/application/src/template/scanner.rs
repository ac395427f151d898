//! Scanner over template text held in memory

use std::collections::HashMap;

use crate::ports::{ScanError, TemplateScanner};

use super::placeholder::extract_placeholder_names;

/// A [`TemplateScanner`] for plain-text templates registered by identifier.
///
/// Binary document formats need their own scanner; this one reads `${...}`
/// tokens from text.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateScanner {
    templates: HashMap<String, String>,
}

impl InMemoryTemplateScanner {
    /// Creates a scanner with no templates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers template text under an identifier.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>, text: impl Into<String>) -> Self {
        self.templates.insert(template.into(), text.into());
        self
    }

    /// Registers or replaces template text.
    pub fn insert(&mut self, template: impl Into<String>, text: impl Into<String>) {
        self.templates.insert(template.into(), text.into());
    }
}

impl TemplateScanner for InMemoryTemplateScanner {
    fn scan(&self, template: &str) -> Result<Vec<String>, ScanError> {
        self.templates
            .get(template)
            .map(|text| extract_placeholder_names(text))
            .ok_or_else(|| ScanError::NotFound(template.to_string()))
    }
}
