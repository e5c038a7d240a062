//! Running ordered rule lists over words.
//!
//! A [`Derivation`] holds compiled rules in the order they were given. Applying
//! it to a word feeds the output of each rule into the next; words are
//! independent of each other, so [`Derivation::apply_all`] may process them in
//! parallel (feature `parallel`).
//!
//! ```rust
//! use soundshift::category::Category;
//! use soundshift::derivation::{load_rules, Derivation};
//!
//! let categories = vec![Category::from_chars("V", "aeiou").unwrap()];
//! let loaded = load_rules("p/b/V_V\n\nbogus\nb/v/V_V", &categories);
//! assert_eq!(loaded.errors.len(), 1);
//! assert_eq!(loaded.errors[0].line, 3);
//!
//! let derivation = Derivation::new(loaded.rules);
//! assert_eq!(derivation.apply("apa"), "ava");
//! ```

use std::fmt;

use crate::category::Category;
use crate::error::RuleError;
use crate::rule::Rule;

/// An ordered list of rules applied in sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Derivation {
    rules: Vec<Rule>,
}

/// One step of a traced derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Position of the rule in the derivation.
    pub index: usize,
    /// The rule as written.
    pub rule: String,
    /// The word after the rule applied.
    pub output: String,
}

impl Derivation {
    /// Creates a derivation from rules in application order.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The rules in application order.
    #[inline]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the derivation has no rules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Appends a rule to the end.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Removes and returns the rule at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<Rule> {
        (index < self.rules.len()).then(|| self.rules.remove(index))
    }

    /// Removes every rule.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Applies every rule in order, each to the previous rule's output.
    pub fn apply(&self, word: &str) -> String {
        self.rules
            .iter()
            .fold(word.to_string(), |current, rule| rule.apply(&current))
    }

    /// Applies every rule in order and records each step that changed the word.
    pub fn trace(&self, word: &str) -> Vec<Step> {
        let mut steps = Vec::new();
        let mut current = word.to_string();
        for (index, rule) in self.rules.iter().enumerate() {
            let output = rule.apply(&current);
            if output != current {
                tracing::trace!(rule = %rule, from = %current, to = %output, "rule applied");
                steps.push(Step {
                    index,
                    rule: rule.to_string(),
                    output: output.clone(),
                });
                current = output;
            }
        }
        steps
    }

    /// Applies the derivation to each word independently, preserving order.
    #[cfg(not(feature = "parallel"))]
    pub fn apply_all<S: AsRef<str>>(&self, words: &[S]) -> Vec<String> {
        words.iter().map(|w| self.apply(w.as_ref())).collect()
    }

    /// Applies the derivation to each word independently, preserving order.
    #[cfg(feature = "parallel")]
    pub fn apply_all<S: AsRef<str> + Sync>(&self, words: &[S]) -> Vec<String> {
        use rayon::prelude::*;

        words.par_iter().map(|w| self.apply(w.as_ref())).collect()
    }
}

impl FromIterator<Rule> for Derivation {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<Rule> for Derivation {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

/// A rule line that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// 1-based line number.
    pub line: usize,
    /// The line as given.
    pub text: String,
    /// Why it failed.
    pub error: RuleError,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: '{}': {}", self.line, self.text, self.error)
    }
}

impl std::error::Error for LineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Result of loading a batch of rule lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedRules {
    /// Rules that compiled, in line order.
    pub rules: Vec<Rule>,
    /// Lines that did not.
    pub errors: Vec<LineError>,
}

/// Compiles newline-separated rules against `categories`.
///
/// Blank lines are skipped. A line that fails to compile is reported in
/// `errors` and logged; the rest of the batch still loads.
pub fn load_rules(text: &str, categories: &[Category]) -> LoadedRules {
    load_lines(text.lines().enumerate().map(|(i, l)| (i + 1, l)), categories)
}

/// Compiles `(line number, text)` pairs, skipping blank lines.
pub(crate) fn load_lines<'a, I>(lines: I, categories: &[Category]) -> LoadedRules
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    let mut loaded = LoadedRules::default();
    for (line, text) in lines {
        let text = text.trim_end_matches('\r');
        if text.trim().is_empty() {
            continue;
        }
        match Rule::compile(text, categories) {
            Ok(rule) => loaded.rules.push(rule),
            Err(error) => {
                tracing::warn!(line, rule = text, %error, "skipping rule");
                loaded.errors.push(LineError {
                    line,
                    text: text.to_string(),
                    error,
                });
            }
        }
    }
    loaded
}
