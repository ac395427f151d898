//! Application error types

use docmerge_domain::DomainError;
use thiserror::Error;

use crate::ports::{LoadError, ScanError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A placeholder of a template could not be resolved.
    #[error("template {template}: placeholder `{placeholder}`: {source}")]
    Placeholder {
        /// Template identifier or path.
        template: String,
        /// The placeholder as written in the template.
        placeholder: String,
        /// The underlying failure.
        source: DomainError,
    },

    /// A placeholder name is not a valid (optionally qualified) identifier.
    #[error("template {template}: invalid placeholder `{placeholder}`")]
    InvalidPlaceholder {
        /// Template identifier or path.
        template: String,
        /// The placeholder as written in the template.
        placeholder: String,
    },

    /// The template scanner failed.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// The source loader failed.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// A domain error occurred outside of placeholder resolution.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
}

impl ApplicationError {
    /// Returns the domain error behind this failure, if there is one.
    #[must_use]
    pub const fn domain_error(&self) -> Option<&DomainError> {
        match self {
            Self::Placeholder { source, .. } | Self::Domain(source) => Some(source),
            Self::InvalidPlaceholder { .. } | Self::Scan(_) | Self::Load(_) => None,
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
