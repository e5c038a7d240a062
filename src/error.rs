//! Error types for rule compilation and category definitions.

use thiserror::Error;

/// Errors raised while compiling a rule from its textual form.
///
/// Compilation is all-or-nothing: when one of these is returned no part of the
/// rule is observable. Everything else a rule can get wrong (unmatched brackets,
/// empty categories, wildcards that never resolve) degrades to a no-op instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The rule text does not split into target/replacement/environment.
    #[error("invalid rule syntax: expected 3-4 '/'-separated fields, got {found}")]
    Syntax {
        /// Number of fields actually found.
        found: usize,
    },
}

/// Errors raised while defining categories.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// A category name must be a non-empty token.
    #[error("category name must not be empty")]
    EmptyName,

    /// A definition line has no `=` between name and values.
    #[error("category definition '{line}' is missing '='")]
    MissingDefinition {
        /// The offending definition text.
        line: String,
    },

    /// A name that cannot be written as a definition line.
    #[error("category name '{name}' cannot be written as a definition")]
    ReservedName {
        /// The offending name.
        name: String,
    },

    /// A value that is empty or contains a separator.
    #[error("category '{name}' has value '{value}' that cannot be written as a definition")]
    ReservedValue {
        /// Name of the category.
        name: String,
        /// The offending value.
        value: String,
    },
}

/// A specialized `Result` type for rule compilation.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Errors raised while parsing a rule-set document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {source}")]
pub struct RuleSetError {
    /// 1-based line number in the document.
    pub line: usize,
    /// The category definition failure.
    #[source]
    pub source: CategoryError,
}
