//! Data sources: ordered, uniquely named collections of holders

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

use super::holder::DataHolder;
use super::lookup::{HolderLookup, evaluate_holder};

/// Name given to the constant source when a configuration supplies none.
pub const CONSTANT_SOURCE_NAME: &str = "constant";

/// Origin label of sources built in memory.
pub const IN_MEMORY_ORIGIN: &str = "<memory>";

/// Where a data source's values come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceKind {
    /// Hardcoded values; the default source for unqualified placeholders.
    #[default]
    Constant,
    /// Values read from a database.
    Database,
    /// Values read from an external file.
    ExternalFile,
    /// Any other backing store, identified by its tag.
    Other(String),
}

impl SourceKind {
    /// Returns the type tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Constant => "constant",
            Self::Database => "database",
            Self::ExternalFile => "external-file",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for SourceKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "constant" => Self::Constant,
            "database" => Self::Database,
            "external-file" => Self::ExternalFile,
            _ => Self::Other(tag),
        }
    }
}

impl From<SourceKind> for String {
    fn from(kind: SourceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable description of a data source, as produced by loaders.
///
/// Variable values are raw definitions: text containing a `${name}`
/// reference becomes an expression, anything else a literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Source name, used as the placeholder qualifier.
    pub name: String,

    /// Type tag.
    #[serde(default)]
    pub kind: SourceKind,

    /// Filename or other origin identifier.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Variables in definition order.
    #[serde(default)]
    pub variables: IndexMap<String, String>,
}

fn default_origin() -> String {
    IN_MEMORY_ORIGIN.to_string()
}

impl SourceDefinition {
    /// Creates an empty definition.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            origin: default_origin(),
            variables: IndexMap::new(),
        }
    }

    /// Sets the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Adds a raw variable definition.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, raw: impl Into<String>) -> Self {
        self.variables.insert(name.into(), raw.into());
        self
    }
}

/// A named, ordered collection of holders sharing a kind tag.
///
/// The set of holders is fixed at construction; only holder values change
/// as expressions get resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    id: Uuid,
    name: String,
    kind: SourceKind,
    origin: String,
    holders: IndexMap<String, DataHolder>,
}

impl DataSource {
    /// Builds a source from holders, keeping their order.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidName` for an empty source or holder name
    /// and `DomainError::DuplicateHolder` if two holders share a name.
    pub fn from_holders(
        name: impl Into<String>,
        kind: SourceKind,
        origin: impl Into<String>,
        holders: impl IntoIterator<Item = DataHolder>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidName(name));
        }

        let mut map = IndexMap::new();
        for holder in holders {
            if holder.name().trim().is_empty() {
                return Err(DomainError::InvalidName(holder.name().to_string()));
            }
            if map.contains_key(holder.name()) {
                return Err(DomainError::DuplicateHolder {
                    source_name: name,
                    name: holder.name().to_string(),
                });
            }
            map.insert(holder.name().to_string(), holder);
        }

        Ok(Self {
            id: Uuid::now_v7(),
            name,
            kind,
            origin: origin.into(),
            holders: map,
        })
    }

    /// Builds a constant source held in memory.
    ///
    /// # Errors
    /// See [`DataSource::from_holders`].
    pub fn constant(
        name: impl Into<String>,
        holders: impl IntoIterator<Item = DataHolder>,
    ) -> DomainResult<Self> {
        Self::from_holders(name, SourceKind::Constant, IN_MEMORY_ORIGIN, holders)
    }

    /// Builds a source from its serializable definition.
    ///
    /// # Errors
    /// See [`DataSource::from_holders`].
    pub fn from_definition(definition: SourceDefinition) -> DomainResult<Self> {
        let SourceDefinition {
            name,
            kind,
            origin,
            variables,
        } = definition;
        let holders = variables
            .into_iter()
            .map(|(var, raw)| DataHolder::from_raw(var, raw));
        Self::from_holders(name, kind, origin, holders)
    }

    /// Returns the unique identifier assigned at construction.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind.
    #[must_use]
    pub const fn kind(&self) -> &SourceKind {
        &self.kind
    }

    /// Returns the type tag, e.g. `"constant"`.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        self.kind.as_str()
    }

    /// Returns the filename or other origin identifier.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns all holders in insertion order.
    pub fn vars(&self) -> impl ExactSizeIterator<Item = &DataHolder> + '_ {
        self.holders.values()
    }

    /// Returns all variable names in insertion order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.holders.keys().map(String::as_str)
    }

    /// Returns the number of holders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.holders.len()
    }

    /// Returns true if the source has no holders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    /// Looks up a holder by name. A missing name is not an error.
    #[must_use]
    pub fn get_data_holder(&self, name: &str) -> Option<&DataHolder> {
        self.holders.get(name)
    }

    /// Resolves the named holder, caching the result in place.
    ///
    /// Literal and already resolved holders are returned without evaluation.
    /// Referenced siblings are evaluated as needed but not cached.
    ///
    /// # Errors
    /// Returns `DomainError::MissingVariable` if the source has no such
    /// holder, or the evaluation error.
    pub fn fill_value(&mut self, name: &str) -> DomainResult<&str> {
        let holder = self.holders.get(name).ok_or_else(|| self.missing(name))?;
        if !holder.is_resolved() {
            let value = evaluate_holder(self, holder)?;
            if let Some(holder) = self.holders.get_mut(name) {
                holder.cache(value);
            }
        }

        match self.holders.get(name) {
            Some(holder) => holder.value(),
            None => Err(self.missing(name)),
        }
    }

    /// Computes the value of the named holder without caching it.
    ///
    /// # Errors
    /// Same as [`DataSource::fill_value`].
    pub fn evaluate(&self, name: &str) -> DomainResult<String> {
        let holder = self.holders.get(name).ok_or_else(|| self.missing(name))?;
        evaluate_holder(self, holder)
    }

    /// Resolves every expression holder, in insertion order.
    ///
    /// # Errors
    /// Stops at the first holder that fails to resolve.
    pub fn fill_all(&mut self) -> DomainResult<()> {
        let pending: Vec<String> = self
            .holders
            .values()
            .filter(|holder| !holder.is_resolved())
            .map(|holder| holder.name().to_string())
            .collect();

        for name in pending {
            self.fill_value(&name)?;
        }
        Ok(())
    }

    fn missing(&self, name: &str) -> DomainError {
        DomainError::MissingVariable {
            source_name: self.name.clone(),
            name: name.to_string(),
        }
    }
}

impl HolderLookup for DataSource {
    fn lookup(&self, name: &str) -> Option<&DataHolder> {
        self.get_data_holder(name)
    }
}
