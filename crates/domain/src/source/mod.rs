//! Data holders, data sources and their configuration

mod config;
mod data_source;
mod holder;
mod lookup;

pub use config::{DEFAULT_SOURCE_ALIAS, DataSourceConfig};
pub use data_source::{
    CONSTANT_SOURCE_NAME, DataSource, IN_MEMORY_ORIGIN, SourceDefinition, SourceKind,
};
pub use holder::{DataHolder, HolderValue};
pub use lookup::HolderLookup;
