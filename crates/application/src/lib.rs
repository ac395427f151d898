//! Docmerge Application - Template processing and ports
//!
//! This crate defines the application layer with:
//! - Port traits (template scanning, source loading, source selection)
//! - Template placeholder resolution
//! - Process-wide configuration access
//! - Application-level error handling

pub mod config_provider;
pub mod error;
pub mod ports;
pub mod settings;
pub mod template;

pub use config_provider::ConfigProvider;
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    LoadError, LoadedSources, ScanError, SourceLoader, SourceRegistry, StaticSourceLoader,
    TemplateScanner,
};
pub use settings::ProcessorSettings;
pub use template::{InMemoryTemplateScanner, TemplateProcessor, TemplateResolution};
