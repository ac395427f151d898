//! Source loader port
//!
//! Supplies the data source definitions a configuration is built from.
//! File or database backed loaders live outside this crate.

use docmerge_domain::SourceDefinition;

/// Errors that can occur while loading source definitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The configuration does not exist.
    #[error("configuration not found: {0}")]
    NotFound(String),

    /// The configuration exists but is invalid.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Raw output of a loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSources {
    /// Identity label of the configuration, e.g. its filename.
    pub filename: String,
    /// Source definitions in configuration order.
    pub sources: Vec<SourceDefinition>,
}

/// Loads data source definitions.
pub trait SourceLoader {
    /// Loads every configured source.
    ///
    /// # Errors
    /// Returns a `LoadError` if the configuration is missing or invalid.
    fn load(&self) -> Result<LoadedSources, LoadError>;
}

/// A loader over definitions held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSourceLoader {
    filename: String,
    sources: Vec<SourceDefinition>,
}

impl StaticSourceLoader {
    /// Creates a loader with no sources.
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            sources: Vec::new(),
        }
    }

    /// Adds a source definition.
    #[must_use]
    pub fn with_source(mut self, source: SourceDefinition) -> Self {
        self.sources.push(source);
        self
    }
}

impl SourceLoader for StaticSourceLoader {
    fn load(&self) -> Result<LoadedSources, LoadError> {
        Ok(LoadedSources {
            filename: self.filename.clone(),
            sources: self.sources.clone(),
        })
    }
}
