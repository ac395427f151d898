//! Source registry port
//!
//! The capability the template processor needs from a configuration: pick a
//! data source by optional name.

use docmerge_domain::{DataSource, DataSourceConfig, DomainResult};

/// Selects data sources by name.
///
/// `None` selects the default (constant) source.
pub trait SourceRegistry {
    /// Returns the named source.
    ///
    /// # Errors
    /// Returns `DomainError::UnknownSource` if no source has that name.
    fn data_source(&self, name: Option<&str>) -> DomainResult<&DataSource>;

    /// Returns the named source mutably, so holder values can be cached.
    ///
    /// # Errors
    /// Returns `DomainError::UnknownSource` if no source has that name.
    fn data_source_mut(&mut self, name: Option<&str>) -> DomainResult<&mut DataSource>;
}

impl SourceRegistry for DataSourceConfig {
    fn data_source(&self, name: Option<&str>) -> DomainResult<&DataSource> {
        Self::data_source(self, name)
    }

    fn data_source_mut(&mut self, name: Option<&str>) -> DomainResult<&mut DataSource> {
        Self::data_source_mut(self, name)
    }
}

impl<R: SourceRegistry + ?Sized> SourceRegistry for &mut R {
    fn data_source(&self, name: Option<&str>) -> DomainResult<&DataSource> {
        (**self).data_source(name)
    }

    fn data_source_mut(&mut self, name: Option<&str>) -> DomainResult<&mut DataSource> {
        (**self).data_source_mut(name)
    }
}
