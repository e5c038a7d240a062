//! REPL state management
//!
//! Holds the rule set being edited and keeps its compiled derivation current.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::category::Category;
use crate::cli::commands::{load_rule_set, save_rule_set};
use crate::derivation::{Derivation, LineError};
use crate::rule::Fields;
use crate::ruleset::RuleSet;

/// REPL session state
#[derive(Debug, Default)]
pub struct ReplState {
    rule_set: RuleSet,
    derivation: Derivation,
    errors: Vec<LineError>,
    /// File the rule set was last loaded from or saved to
    pub rules_path: Option<PathBuf>,
}

impl ReplState {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// The rule set being edited
    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// The compiled rules
    pub fn derivation(&self) -> &Derivation {
        &self.derivation
    }

    /// Rule lines that failed to compile
    pub fn errors(&self) -> &[LineError] {
        &self.errors
    }

    /// Append a rule, rejecting malformed text
    pub fn add_rule(&mut self, text: &str) -> Result<()> {
        Fields::parse(text)?;
        self.rule_set.add_rule(text);
        self.recompile();
        Ok(())
    }

    /// Add a category definition such as `V=aeiou`
    pub fn add_category(&mut self, definition: &str) -> Result<()> {
        let category: Category = definition.parse()?;
        self.rule_set.add_category(category)?;
        self.recompile();
        Ok(())
    }

    /// Remove the rule at 1-based `position`
    pub fn drop_rule(&mut self, position: usize) -> Option<String> {
        let removed = self.rule_set.remove_rule(position.checked_sub(1)?)?;
        self.recompile();
        Some(removed)
    }

    /// Remove every rule and category
    pub fn clear(&mut self) {
        self.rule_set.clear();
        self.recompile();
    }

    /// Replace the session with a rule set read from `path`
    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.rule_set = load_rule_set(path, None)?;
        self.rules_path = Some(path.to_path_buf());
        self.recompile();
        Ok(())
    }

    /// Write the rule set to `path`
    pub fn save(&mut self, path: &Path) -> Result<()> {
        save_rule_set(&self.rule_set, path, None)?;
        self.rules_path = Some(path.to_path_buf());
        Ok(())
    }

    fn recompile(&mut self) {
        let (derivation, errors) = self.rule_set.compile();
        self.derivation = derivation;
        self.errors = errors;
    }
}
