//! A single named variable and its resolution state

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::expression::is_expression;

use super::lookup::{HolderLookup, evaluate_holder};

/// The value state of a [`DataHolder`].
///
/// Expression holders start `Unresolved` and move to `Resolved` exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum HolderValue {
    /// A plain value, usable as is.
    Literal {
        /// The literal text.
        value: String,
    },
    /// An expression that has not been evaluated yet.
    Unresolved {
        /// The raw expression text.
        expression: String,
    },
    /// An evaluated expression with its cached result.
    Resolved {
        /// The raw expression text.
        expression: String,
        /// The cached result.
        value: String,
    },
}

impl HolderValue {
    /// Returns the state after caching `value`.
    ///
    /// Only an `Unresolved` state changes; literals and resolved states are
    /// returned unchanged.
    #[must_use]
    pub fn resolve(self, value: String) -> Self {
        match self {
            Self::Unresolved { expression } => Self::Resolved { expression, value },
            settled => settled,
        }
    }

    /// Returns the usable value, if there is one yet.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Literal { value } | Self::Resolved { value, .. } => Some(value),
            Self::Unresolved { .. } => None,
        }
    }

    /// Returns the raw expression text, if this is an expression.
    #[must_use]
    pub fn expression(&self) -> Option<&str> {
        match self {
            Self::Unresolved { expression } | Self::Resolved { expression, .. } => {
                Some(expression)
            }
            Self::Literal { .. } => None,
        }
    }
}

/// A named variable of a data source: either a literal value or an
/// expression over sibling variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataHolder {
    name: String,
    #[serde(flatten)]
    value: HolderValue,
}

impl DataHolder {
    /// Creates a holder with a literal value.
    #[must_use]
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: HolderValue::Literal {
                value: value.into(),
            },
        }
    }

    /// Creates an unresolved expression holder.
    #[must_use]
    pub fn expression(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: HolderValue::Unresolved {
                expression: expression.into(),
            },
        }
    }

    /// Creates a holder from a raw definition: text containing a `${`
    /// reference is an expression, anything else a literal.
    #[must_use]
    pub fn from_raw(name: impl Into<String>, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if is_expression(&raw) {
            Self::expression(name, raw)
        } else {
            Self::literal(name, raw)
        }
    }

    /// Returns the variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the literal or resolved value.
    ///
    /// # Errors
    /// Returns `DomainError::UnresolvedExpression` for an expression holder
    /// whose value has not been filled yet.
    pub fn value(&self) -> DomainResult<&str> {
        self.value
            .value()
            .ok_or_else(|| DomainError::UnresolvedExpression(self.name.clone()))
    }

    /// Returns the raw expression text, or `None` for literal holders.
    #[must_use]
    pub fn expr(&self) -> Option<&str> {
        self.value.expression()
    }

    /// Returns the current value state.
    #[must_use]
    pub const fn state(&self) -> &HolderValue {
        &self.value
    }

    /// Returns true once the value can be read without evaluation.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self.value, HolderValue::Unresolved { .. })
    }

    /// Returns true if the holder is defined by an expression.
    #[must_use]
    pub const fn is_expression(&self) -> bool {
        !matches!(self.value, HolderValue::Literal { .. })
    }

    /// Evaluates the expression against `siblings` and caches the result.
    ///
    /// Calling this again, or on a literal holder, returns the existing value
    /// without evaluating anything. Siblings are only read.
    ///
    /// # Errors
    /// Returns the evaluation error; the holder stays unresolved in that case.
    pub fn fill_value<L>(&mut self, siblings: &L) -> DomainResult<&str>
    where
        L: HolderLookup + ?Sized,
    {
        if !self.is_resolved() {
            let value = evaluate_holder(siblings, self)?;
            self.cache(value);
        }
        self.value()
    }

    pub(super) fn cache(&mut self, value: String) {
        let state = std::mem::replace(
            &mut self.value,
            HolderValue::Literal {
                value: String::new(),
            },
        );
        self.value = state.resolve(value);
    }
}
