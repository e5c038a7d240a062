//! Rule-set documents: category definitions plus an ordered list of rules.
//!
//! The text form (conventionally `.sc`) has one item per line:
//!
//! ```text
//! ! voicing between vowels
//! S=ptk
//! Z=bdg
//! V=aeiou
//! S/Z/V_V
//! ```
//!
//! - blank lines and lines starting with `!` are ignored;
//! - a line with `=` but no `/` defines a category (see [`Category`]'s
//!   `FromStr` for the value syntax);
//! - every other line is a rule.
//!
//! Every rule sees every category of the document, wherever it is defined.
//! With the `serialization` feature a rule set also reads and writes JSON:
//! `{"categories":[{"name":"V","values":["a","e"]}],"rules":["V/i/_#"]}`.

use std::fmt;
use std::str::FromStr;

use crate::category::Category;
use crate::derivation::{self, Derivation, LineError};
use crate::error::{CategoryError, RuleSetError};
use crate::rule::syntax::FIELD_SEPARATOR;

const COMMENT: char = '!';
const DEFINITION: char = '=';

/// Categories and rule lines, in document order.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleSet {
    categories: Vec<Category>,
    rules: Vec<String>,
    /// Document line of each rule, when parsed from text.
    #[cfg_attr(feature = "serialization", serde(skip))]
    origins: Vec<usize>,
}

impl RuleSet {
    /// An empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the text form.
    ///
    /// # Errors
    ///
    /// Fails on the first category definition with an empty name. Malformed
    /// rule lines are not checked here; see [`RuleSet::compile`].
    pub fn parse(text: &str) -> Result<Self, RuleSetError> {
        let mut set = Self::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT) {
                continue;
            }
            if trimmed.contains(DEFINITION) && !trimmed.contains(FIELD_SEPARATOR) {
                let category = trimmed.parse().map_err(|source| RuleSetError {
                    line: index + 1,
                    source,
                })?;
                set.categories.push(category);
            } else {
                set.rules.push(trimmed.to_string());
                set.origins.push(index + 1);
            }
        }
        tracing::debug!(
            categories = set.categories.len(),
            rules = set.rules.len(),
            "parsed rule set"
        );
        Ok(set)
    }

    /// Category definitions in document order.
    #[inline]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Rule lines in document order.
    #[inline]
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Adds a category definition.
    ///
    /// # Errors
    ///
    /// Rejects a category whose definition line would not read back as
    /// itself; see [`Category::check_definable`].
    pub fn add_category(&mut self, category: Category) -> Result<(), CategoryError> {
        category.check_definable()?;
        self.categories.push(category);
        Ok(())
    }

    /// Appends a rule line.
    pub fn add_rule(&mut self, rule: impl Into<String>) {
        self.rules.push(rule.into());
        self.origins.clear();
    }

    /// Removes the rule line at `index`.
    pub fn remove_rule(&mut self, index: usize) -> Option<String> {
        if index >= self.rules.len() {
            return None;
        }
        self.origins.clear();
        Some(self.rules.remove(index))
    }

    /// Removes every category and rule.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Compiles every rule line against the document's categories.
    ///
    /// Line numbers in the returned errors refer to the parsed document, or to
    /// the rule's 1-based position when the set was built another way.
    pub fn compile(&self) -> (Derivation, Vec<LineError>) {
        let numbered = self.rules.iter().enumerate().map(|(i, rule)| {
            let line = self.origins.get(i).copied().unwrap_or(i + 1);
            (line, rule.as_str())
        });
        let loaded = derivation::load_lines(numbered, &self.categories);
        (Derivation::new(loaded.rules), loaded.errors)
    }

    /// Reads the JSON form.
    #[cfg(feature = "serialization")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Writes the JSON form, pretty-printed.
    #[cfg(feature = "serialization")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl PartialEq for RuleSet {
    fn eq(&self, other: &Self) -> bool {
        self.categories == other.categories && self.rules == other.rules
    }
}

impl Eq for RuleSet {}

impl FromStr for RuleSet {
    type Err = RuleSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RuleSet {
    /// Writes the text form: categories first, then rules.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in &self.categories {
            writeln!(f, "{category}")?;
        }
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}
