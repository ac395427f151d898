//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the resolution core and external systems:
//! template scanners for specific document formats, configuration loaders, and
//! the source registry the processor resolves against.

mod source_loader;
mod source_registry;
mod template_scanner;

pub use source_loader::{LoadError, LoadedSources, SourceLoader, StaticSourceLoader};
pub use source_registry::SourceRegistry;
pub use template_scanner::{ScanError, TemplateScanner};
