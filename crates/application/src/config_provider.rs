//! Process-wide data source configuration
//!
//! Loads the configuration once and hands every template session its own
//! copy, so resolution caches are never shared between sessions.

use std::sync::OnceLock;

use docmerge_domain::{DataSource, DataSourceConfig};

use crate::error::ApplicationResult;
use crate::ports::{SourceLoader, TemplateScanner};
use crate::template::TemplateProcessor;

/// Owns the loader and the loaded configuration.
///
/// Create one per process and pass it by reference to whatever processes
/// templates.
#[derive(Debug)]
pub struct ConfigProvider<L> {
    loader: L,
    loaded: OnceLock<DataSourceConfig>,
}

impl<L: SourceLoader> ConfigProvider<L> {
    /// Creates a provider; nothing is loaded until the first instance is
    /// requested.
    pub const fn new(loader: L) -> Self {
        Self {
            loader,
            loaded: OnceLock::new(),
        }
    }

    /// Returns a fresh configuration instance.
    ///
    /// The first call loads the sources; later calls return copies of the
    /// same unresolved configuration.
    ///
    /// # Errors
    /// Returns `ApplicationError::Load` if the loader fails and
    /// `ApplicationError::Domain` if the loaded sources are inconsistent.
    /// A failed load is retried on the next call.
    pub fn new_instance(&self) -> ApplicationResult<DataSourceConfig> {
        let config = match self.loaded.get() {
            Some(config) => config,
            None => {
                let config = self.load()?;
                self.loaded.get_or_init(|| config)
            }
        };
        Ok(config.clone())
    }

    /// Returns true once the configuration has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Creates a template processor over a fresh configuration instance.
    ///
    /// # Errors
    /// Same as [`ConfigProvider::new_instance`].
    pub fn processor<S: TemplateScanner>(
        &self,
        scanner: S,
    ) -> ApplicationResult<TemplateProcessor<S, DataSourceConfig>> {
        Ok(TemplateProcessor::new(scanner, self.new_instance()?))
    }

    fn load(&self) -> ApplicationResult<DataSourceConfig> {
        let loaded = self.loader.load()?;
        let sources = loaded
            .sources
            .into_iter()
            .map(DataSource::from_definition)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            filename = loaded.filename.as_str(),
            sources = sources.len(),
            "data source configuration loaded"
        );
        Ok(DataSourceConfig::new(loaded.filename, sources)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::{LoadError, LoadedSources, StaticSourceLoader};
    use docmerge_domain::{DomainError, SourceDefinition, SourceKind};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    struct CountingLoader {
        calls: Cell<usize>,
        inner: StaticSourceLoader,
    }

    impl SourceLoader for CountingLoader {
        fn load(&self) -> Result<LoadedSources, LoadError> {
            self.calls.set(self.calls.get() + 1);
            self.inner.load()
        }
    }

    fn create_test_loader() -> StaticSourceLoader {
        StaticSourceLoader::new("UwrTest").with_source(
            SourceDefinition::new("constant", SourceKind::Constant)
                .with_variable("sex", "Female")
                .with_variable("readme", "5")
                .with_variable("num", "0")
                .with_variable("testexpr", "${num}+${readme}"),
        )
    }

    #[test]
    fn test_new_instance_is_stable() {
        let provider = ConfigProvider::new(create_test_loader());
        let first = provider.new_instance().unwrap();
        let second = provider.new_instance().unwrap();

        assert_eq!(first.filename(), "UwrTest");
        assert_eq!(first.const_data_source(), second.const_data_source());
        assert_eq!(
            first
                .const_data_source()
                .get_data_holder("sex")
                .unwrap()
                .value()
                .unwrap(),
            "Female"
        );
    }

    #[test]
    fn test_loads_once() {
        let provider = ConfigProvider::new(CountingLoader {
            calls: Cell::new(0),
            inner: create_test_loader(),
        });
        assert!(!provider.is_loaded());

        provider.new_instance().unwrap();
        provider.new_instance().unwrap();

        assert!(provider.is_loaded());
        assert_eq!(provider.loader.calls.get(), 1);
    }

    #[test]
    fn test_instances_do_not_share_caches() {
        let provider = ConfigProvider::new(create_test_loader());
        let mut first = provider.new_instance().unwrap();
        first.const_data_source_mut().fill_value("testexpr").unwrap();

        let second = provider.new_instance().unwrap();
        assert!(
            !second
                .const_data_source()
                .get_data_holder("testexpr")
                .unwrap()
                .is_resolved()
        );
    }

    #[test]
    fn test_load_error_is_reported() {
        struct Failing;
        impl SourceLoader for Failing {
            fn load(&self) -> Result<LoadedSources, LoadError> {
                Err(LoadError::NotFound("sources.json".to_string()))
            }
        }

        let provider = ConfigProvider::new(Failing);
        let error = provider.new_instance().unwrap_err();
        assert!(matches!(error, ApplicationError::Load(LoadError::NotFound(_))));
        assert!(!provider.is_loaded());
    }

    #[test]
    fn test_inconsistent_sources_are_reported() {
        let loader = StaticSourceLoader::new("cfg")
            .with_source(SourceDefinition::new("dup", SourceKind::Constant))
            .with_source(SourceDefinition::new("dup", SourceKind::Database));

        let error = ConfigProvider::new(loader).new_instance().unwrap_err();
        assert_eq!(
            error.domain_error(),
            Some(&DomainError::DuplicateSource("dup".to_string()))
        );
    }
}
