//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while building sources or resolving holders.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A source name matched no configured data source.
    #[error("unknown data source: {0}")]
    UnknownSource(String),

    /// An expression references a variable that its source does not define.
    #[error("variable `{holder}` references undefined variable `{reference}`")]
    UnresolvedReference {
        /// The holder whose expression contains the reference.
        holder: String,
        /// The missing variable name.
        reference: String,
    },

    /// Evaluating an expression revisited a holder that was still being evaluated.
    #[error("cyclic expression: {}", chain.join(" -> "))]
    CyclicExpression {
        /// Holder names in evaluation order, ending with the revisited one.
        chain: Vec<String>,
    },

    /// An expression could not be parsed.
    #[error("malformed expression `{expression}`: {reason}")]
    MalformedExpression {
        /// The raw expression text.
        expression: String,
        /// What the parser rejected.
        reason: String,
    },

    /// A variable is absent from the source it was looked up in.
    #[error("variable `{name}` is not defined in data source `{source_name}`")]
    MissingVariable {
        /// The data source that was searched.
        source_name: String,
        /// The missing variable name.
        name: String,
    },

    /// The value of an expression holder was read before it was resolved.
    #[error("expression variable `{0}` has not been resolved")]
    UnresolvedExpression(String),

    /// An expression parsed but could not be computed.
    #[error("cannot evaluate `{expression}`: {reason}")]
    Arithmetic {
        /// The raw expression text.
        expression: String,
        /// Why evaluation failed.
        reason: String,
    },

    /// Two holders of one data source share a name.
    #[error("duplicate variable `{name}` in data source `{source_name}`")]
    DuplicateHolder {
        /// The data source being built.
        source_name: String,
        /// The repeated variable name.
        name: String,
    },

    /// Two data sources of one configuration share a name.
    #[error("duplicate data source: {0}")]
    DuplicateSource(String),

    /// A holder or source name is empty or otherwise unusable.
    #[error("invalid name: {0:?}")]
    InvalidName(String),
}

impl DomainError {
    /// Creates a malformed expression error.
    pub fn malformed(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Creates an arithmetic error.
    pub fn arithmetic(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Arithmetic {
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
