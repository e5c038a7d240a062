//! Sound-change rules: compilation and application.
//!
//! A [`Rule`] is compiled once from text such as `S/Z/V_V` and a list of
//! categories, then applied to any number of words. Compilation turns the
//! rule into a flat table of concrete mappings (see [`mapping`]); application
//! rewrites a word with that table in a single pass (see [`application`]).
//!
//! # Example
//!
//! ```rust
//! use soundshift::category::Category;
//! use soundshift::rule::Rule;
//!
//! let categories = vec![
//!     Category::from_chars("S", "ptk").unwrap(),
//!     Category::from_chars("Z", "bdg").unwrap(),
//!     Category::from_chars("V", "aeiou").unwrap(),
//! ];
//! let lenition = Rule::compile("S/Z/V_V", &categories).unwrap();
//! assert_eq!(lenition.apply("qipa kita tika"), "qiba kida tiga");
//! ```
//!
//! # Sharing
//!
//! Compiled rules are immutable; [`Rule::apply`] only touches per-call state,
//! so a rule can be shared freely between threads.

pub mod application;
pub mod mapping;
pub mod syntax;

#[cfg(test)]
mod properties;

use std::fmt;
use std::str::FromStr;

use crate::category::{Category, CategorySet};
use crate::error::{Result, RuleError};

pub use mapping::Mapping;
pub use syntax::Fields;

/// A compiled sound-change rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Fields as written.
    fields: Fields,
    /// Caller categories plus inline and boundary categories.
    categories: CategorySet,
    mappings: Vec<Mapping>,
    exceptions: Vec<String>,
}

impl Rule {
    /// Compiles `TARGET/REPLACEMENT/ENVIRONMENT[/EXCEPTION]` against `categories`.
    ///
    /// `categories` is copied; inline categories are added to the rule's own
    /// working list only.
    ///
    /// # Errors
    ///
    /// [`RuleError::Syntax`] when the text has fewer than three fields.
    pub fn compile(text: &str, categories: &[Category]) -> Result<Self> {
        let fields = Fields::parse(text)?;
        Ok(Self::from_fields(fields, categories))
    }

    /// Compiles a rule from already separated fields.
    pub fn from_fields(fields: Fields, categories: &[Category]) -> Self {
        let mut working = CategorySet::new(categories);
        let resolved = fields
            .clone()
            .map(|field| syntax::extract_nonce(field, &mut working));
        working.insert(Category::boundary());

        let mut table = mapping::generate(&resolved, &working);
        for combination in syntax::optional_combinations(&resolved) {
            table.extend(mapping::generate(&combination, &working));
        }

        tracing::debug!(
            rule = %fields,
            mappings = table.mappings.len(),
            exceptions = table.exceptions.len(),
            "compiled rule"
        );

        Self {
            fields,
            categories: working,
            mappings: table.mappings,
            exceptions: table.exceptions,
        }
    }

    /// Applies the rule to `input`.
    ///
    /// Each position of the input is rewritten at most once, and text produced
    /// by one mapping is never matched by another. Text from the first `‣`
    /// onward is returned unchanged.
    pub fn apply(&self, input: &str) -> String {
        application::apply(&self.mappings, &self.exceptions, input)
    }

    /// The fields as written.
    #[inline]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The target field.
    #[inline]
    pub fn target(&self) -> &str {
        &self.fields.target
    }

    /// The replacement field.
    #[inline]
    pub fn replacement(&self) -> &str {
        &self.fields.replacement
    }

    /// The environment field.
    #[inline]
    pub fn environment(&self) -> &str {
        &self.fields.environment
    }

    /// The exception field; empty when the rule has none.
    #[inline]
    pub fn exception(&self) -> &str {
        &self.fields.exception
    }

    /// The categories visible to this rule, in scan order.
    #[inline]
    pub fn categories(&self) -> &[Category] {
        self.categories.as_slice()
    }

    /// The compiled mapping table, in application order.
    #[inline]
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Concrete exception templates masked before any mapping applies.
    #[inline]
    pub fn exceptions(&self) -> &[String] {
        &self.exceptions
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fields.fmt(f)
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    /// Compiles a rule that uses no caller categories.
    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s, &[])
    }
}
