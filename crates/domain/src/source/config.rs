//! Registry of data sources with a designated constant source

use crate::error::{DomainError, DomainResult};
use crate::expression::is_valid_identifier;

use super::data_source::{CONSTANT_SOURCE_NAME, DataSource, SourceKind};

/// Source name that selects the constant source, like an absent name does.
pub const DEFAULT_SOURCE_ALIAS: &str = "default";

/// Holds every configured data source, keyed by name.
///
/// Exactly one source is the constant source, used whenever a lookup names
/// no source:
/// 1. `None`, an empty name, or [`DEFAULT_SOURCE_ALIAS`] select it
/// 2. any other name must match a configured source exactly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceConfig {
    filename: String,
    sources: Vec<DataSource>,
    constant: usize,
}

impl DataSourceConfig {
    /// Creates a configuration from already loaded sources.
    ///
    /// The first source of kind [`SourceKind::Constant`] becomes the constant
    /// source. Without one, an empty constant source named
    /// [`CONSTANT_SOURCE_NAME`] is put in front.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidName` if a source name is not an
    /// identifier or is [`DEFAULT_SOURCE_ALIAS`], and
    /// `DomainError::DuplicateSource` if two sources share a name.
    pub fn new(filename: impl Into<String>, sources: Vec<DataSource>) -> DomainResult<Self> {
        let mut sources = sources;
        for (i, source) in sources.iter().enumerate() {
            if !is_valid_identifier(source.name()) || source.name() == DEFAULT_SOURCE_ALIAS {
                return Err(DomainError::InvalidName(source.name().to_string()));
            }
            if sources[..i].iter().any(|other| other.name() == source.name()) {
                return Err(DomainError::DuplicateSource(source.name().to_string()));
            }
        }

        let constant = if let Some(index) = sources
            .iter()
            .position(|source| source.kind() == &SourceKind::Constant)
        {
            index
        } else {
            if sources.iter().any(|source| source.name() == CONSTANT_SOURCE_NAME) {
                return Err(DomainError::DuplicateSource(CONSTANT_SOURCE_NAME.to_string()));
            }
            sources.insert(0, DataSource::constant(CONSTANT_SOURCE_NAME, [])?);
            0
        };

        tracing::debug!(
            sources = sources.len(),
            constant = sources[constant].name(),
            "data source configuration assembled"
        );

        Ok(Self {
            filename: filename.into(),
            sources,
            constant,
        })
    }

    /// Returns the filename or identity label of this configuration.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns all sources in configuration order.
    #[must_use]
    pub fn data_sources(&self) -> &[DataSource] {
        &self.sources
    }

    /// Returns the source with the given name, or the constant source for a
    /// default name.
    ///
    /// # Errors
    /// Returns `DomainError::UnknownSource` if a non-default name matches no
    /// source.
    pub fn data_source(&self, name: Option<&str>) -> DomainResult<&DataSource> {
        let index = self.index_of(name)?;
        Ok(&self.sources[index])
    }

    /// Mutable variant of [`DataSourceConfig::data_source`].
    ///
    /// # Errors
    /// Returns `DomainError::UnknownSource` if a non-default name matches no
    /// source.
    pub fn data_source_mut(&mut self, name: Option<&str>) -> DomainResult<&mut DataSource> {
        let index = self.index_of(name)?;
        Ok(&mut self.sources[index])
    }

    /// Returns the constant source.
    #[must_use]
    pub fn const_data_source(&self) -> &DataSource {
        &self.sources[self.constant]
    }

    /// Returns the constant source mutably.
    pub fn const_data_source_mut(&mut self) -> &mut DataSource {
        &mut self.sources[self.constant]
    }

    /// Returns true if `name` selects the constant source.
    #[must_use]
    pub fn is_default_name(name: Option<&str>) -> bool {
        matches!(name, None | Some("" | DEFAULT_SOURCE_ALIAS))
    }

    fn index_of(&self, name: Option<&str>) -> DomainResult<usize> {
        match name {
            None | Some("" | DEFAULT_SOURCE_ALIAS) => Ok(self.constant),
            Some(name) => self
                .sources
                .iter()
                .position(|source| source.name() == name)
                .ok_or_else(|| DomainError::UnknownSource(name.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::source::DataHolder;
    use pretty_assertions::assert_eq;

    fn create_test_config() -> DataSourceConfig {
        let constants = DataSource::constant(
            "constants",
            [
                DataHolder::literal("sex", "Female"),
                DataHolder::literal("readme", "5"),
            ],
        )
        .unwrap();
        let crm = DataSource::from_holders(
            "crm",
            SourceKind::Database,
            "crm.sqlite",
            [DataHolder::literal("customer", "ACME")],
        )
        .unwrap();

        DataSourceConfig::new("UwrTest", vec![crm, constants]).unwrap()
    }

    #[test]
    fn test_default_names_select_constant_source() {
        let config = create_test_config();
        let constant = config.const_data_source();
        assert_eq!(constant.name(), "constants");

        for name in [None, Some(""), Some(DEFAULT_SOURCE_ALIAS)] {
            let source = config.data_source(name).unwrap();
            assert!(std::ptr::eq(source, constant), "{name:?} should select constants");
            assert!(DataSourceConfig::is_default_name(name));
        }
        assert!(!DataSourceConfig::is_default_name(Some("crm")));
    }

    #[test]
    fn test_named_lookup() {
        let config = create_test_config();
        let crm = config.data_source(Some("crm")).unwrap();
        assert_eq!(crm.type_tag(), "database");
        assert_eq!(
            crm.get_data_holder("customer").unwrap().value().unwrap(),
            "ACME"
        );
        assert_eq!(
            config.data_source(Some("constants")).unwrap().name(),
            "constants"
        );
    }

    #[test]
    fn test_unknown_source() {
        let config = create_test_config();
        assert_eq!(
            config.data_source(Some("ldap")).unwrap_err(),
            DomainError::UnknownSource("ldap".to_string())
        );
    }

    #[test]
    fn test_constant_source_inserted_when_absent() {
        let crm = DataSource::from_holders("crm", SourceKind::Database, "crm.sqlite", []).unwrap();
        let config = DataSourceConfig::new("cfg", vec![crm]).unwrap();

        assert_eq!(config.data_sources().len(), 2);
        assert_eq!(config.const_data_source().name(), CONSTANT_SOURCE_NAME);
        assert!(config.const_data_source().is_empty());
        assert_eq!(config.data_sources()[0].name(), CONSTANT_SOURCE_NAME);
    }

    #[test]
    fn test_reserved_and_invalid_source_names_rejected() {
        for name in [DEFAULT_SOURCE_ALIAS, "my source", "1st", "crm.sub"] {
            let source = DataSource::from_holders(
                name,
                SourceKind::Database,
                "db",
                [DataHolder::literal("x", "1")],
            )
            .unwrap();
            assert_eq!(
                DataSourceConfig::new("cfg", vec![source]).unwrap_err(),
                DomainError::InvalidName(name.to_string()),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_default_alias_never_shadows_constant_source() {
        let config = DataSourceConfig::new(
            "cfg",
            vec![
                DataSource::constant("constant", [DataHolder::literal("x", "const")]).unwrap(),
                DataSource::from_holders(
                    "crm",
                    SourceKind::Database,
                    "db",
                    [DataHolder::literal("x", "crm")],
                )
                .unwrap(),
            ],
        )
        .unwrap();
        let holder = config
            .data_source(Some(DEFAULT_SOURCE_ALIAS))
            .unwrap()
            .get_data_holder("x")
            .unwrap();
        assert_eq!(holder.value().unwrap(), "const");
    }

    #[test]
    fn test_duplicate_sources_rejected() {
        let a = DataSource::constant("same", []).unwrap();
        let b = DataSource::constant("same", []).unwrap();
        assert_eq!(
            DataSourceConfig::new("cfg", vec![a, b]).unwrap_err(),
            DomainError::DuplicateSource("same".to_string())
        );
    }

    #[test]
    fn test_first_constant_source_wins() {
        let first = DataSource::constant("first", []).unwrap();
        let second = DataSource::constant("second", []).unwrap();
        let config = DataSourceConfig::new("cfg", vec![first, second]).unwrap();
        assert_eq!(config.const_data_source().name(), "first");
    }

    #[test]
    fn test_mutable_access_resolves_in_place() {
        let mut config = DataSourceConfig::new(
            "cfg",
            vec![
                DataSource::constant(
                    "c",
                    [
                        DataHolder::literal("a", "0"),
                        DataHolder::literal("b", "5"),
                        DataHolder::expression("sum", "${a}+${b}"),
                    ],
                )
                .unwrap(),
            ],
        )
        .unwrap();

        assert_eq!(
            config.data_source_mut(None).unwrap().fill_value("sum").unwrap(),
            "5.0"
        );
        assert!(
            config
                .const_data_source()
                .get_data_holder("sum")
                .unwrap()
                .is_resolved()
        );
        assert_eq!(config.const_data_source_mut().name(), "c");
    }

    #[test]
    fn test_filename() {
        assert_eq!(create_test_config().filename(), "UwrTest");
    }
}
