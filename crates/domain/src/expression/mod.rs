//! Expression language for derived variables
//!
//! An expression combines numbers, quoted strings and `${identifier}`
//! references with `+`, `-`, `*`, `/` and parentheses.
//!
//! # Usage
//!
//! ```
//! use docmerge_domain::expression::Expression;
//!
//! let expr = Expression::parse("${a} + ${b} * 2").unwrap();
//! assert_eq!(expr.references(), vec!["a", "b"]);
//!
//! let value = expr
//!     .evaluate(|name| Ok(if name == "a" { "1".to_string() } else { "2".to_string() }))
//!     .unwrap();
//! assert_eq!(value.render(), "5.0");
//! ```

mod eval;
mod parser;
mod value;

pub use parser::{BinaryOp, MAX_NESTING_DEPTH, Node};
pub use value::{Value, format_number};

use crate::error::DomainResult;

/// Marker that opens a variable reference inside an expression.
pub const REFERENCE_OPEN: &str = "${";

/// A parsed expression together with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Node,
}

impl Expression {
    /// Parses an expression.
    ///
    /// # Errors
    /// Returns `DomainError::MalformedExpression` if the text is not a valid
    /// expression.
    pub fn parse(source: &str) -> DomainResult<Self> {
        let root = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// Returns the raw expression text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the root node of the syntax tree.
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Returns referenced variable names in first-use order, without duplicates.
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.root.collect_references(&mut names);
        names
    }

    /// Evaluates the expression, asking `resolve` for the raw value of every
    /// referenced variable. Operands are evaluated left to right.
    ///
    /// # Errors
    /// Propagates errors from `resolve`, and returns `DomainError::Arithmetic`
    /// when an operation cannot be computed.
    pub fn evaluate<F>(&self, mut resolve: F) -> DomainResult<Value>
    where
        F: FnMut(&str) -> DomainResult<String>,
    {
        eval::evaluate(&self.root, &self.source, &mut resolve)
    }
}

/// Returns true if the raw definition text should be treated as an expression.
#[must_use]
pub fn is_expression(raw: &str) -> bool {
    raw.contains(REFERENCE_OPEN)
}

/// Validates a variable or source identifier.
/// Valid names start with a letter or underscore, followed by letters,
/// digits, underscores or hyphens.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}
