//! Template placeholder resolution
//!
//! Provides parsing of `${placeholder}` syntax and the processor that maps a
//! template's placeholders to resolved values.
//!
//! # Usage
//!
//! ```
//! use docmerge_application::template::{InMemoryTemplateScanner, TemplateProcessor};
//! use docmerge_domain::{DataHolder, DataSource, DataSourceConfig};
//!
//! let constants = DataSource::constant(
//!     "constant",
//!     [
//!         DataHolder::literal("a", "0"),
//!         DataHolder::literal("b", "5"),
//!         DataHolder::expression("c", "${a}+${b}"),
//!     ],
//! )
//! .unwrap();
//! let config = DataSourceConfig::new("example", vec![constants]).unwrap();
//! let scanner = InMemoryTemplateScanner::new().with_template("letter", "Total: ${c}");
//!
//! let mut processor = TemplateProcessor::new(scanner, config);
//! let result = processor.extract_variables("letter").unwrap();
//! assert_eq!(result.get("c"), Some("5.0"));
//! ```

pub mod placeholder;
pub mod processor;
pub mod scanner;

pub use placeholder::{
    Placeholder, PlaceholderReference, extract_placeholder_names, has_placeholders,
    parse_placeholders,
};
pub use processor::{ResolvedPlaceholder, TemplateProcessor, TemplateResolution};
pub use scanner::InMemoryTemplateScanner;
