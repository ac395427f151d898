//! Docmerge Domain - Variable resolution types
//!
//! This crate defines data holders, data sources, their configuration and
//! the expression language used by derived variables.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod expression;
pub mod source;

pub use error::{DomainError, DomainResult};
pub use expression::{Expression, Value, format_number, is_valid_identifier};
pub use source::{
    DataHolder, DataSource, DataSourceConfig, HolderLookup, HolderValue, SourceDefinition,
    SourceKind,
};
