//! Template scanner port
//!
//! Discovers the placeholder names a template references. Each document
//! format brings its own scanner.

/// Errors that can occur while scanning a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// The template does not exist.
    #[error("template not found: {0}")]
    NotFound(String),

    /// The template exists but could not be read or understood.
    #[error("cannot read template {template}: {reason}")]
    Unreadable {
        /// Template identifier or path.
        template: String,
        /// What went wrong.
        reason: String,
    },
}

/// Discovers placeholders in a template.
pub trait TemplateScanner {
    /// Returns the placeholder names referenced by the template, in document
    /// order. Names may be qualified with a source name (`source.name`) and
    /// may repeat.
    ///
    /// # Arguments
    /// * `template` - Template identifier or path
    ///
    /// # Errors
    /// Returns `ScanError::NotFound` if the template does not exist.
    fn scan(&self, template: &str) -> Result<Vec<String>, ScanError>;
}

impl<T: TemplateScanner + ?Sized> TemplateScanner for &T {
    fn scan(&self, template: &str) -> Result<Vec<String>, ScanError> {
        (**self).scan(template)
    }
}
