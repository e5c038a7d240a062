//! Rule text: field splitting, inline categories and optional elements.
//!
//! A rule is written `TARGET/REPLACEMENT/ENVIRONMENT[/EXCEPTION]`. Inside the
//! fields the following notations are recognised:
//!
//! | Marker | Meaning |
//! |--------|---------|
//! | `_`    | cursor: where the target sits inside an environment or exception |
//! | `#`    | word boundary (built-in whitespace category) |
//! | `(..)` | optional element |
//! | `[..]` | inline category, one value per character |
//! | `…`    | wildcard: arbitrary text, captured and echoed into the replacement |
//! | `²`    | the matched segment repeated (gemination) |
//! | `\\`   | as the whole replacement: reverse the matched text (metathesis) |
//!
//! In input text, `‣` starts a gloss that is passed through untouched.

use std::fmt;
use std::str::FromStr;

use crate::category::{Category, CategorySet};
use crate::error::{Result, RuleError};

/// Separates the fields of a rule.
pub const FIELD_SEPARATOR: char = '/';
/// Position of the target inside an environment or exception.
pub const CURSOR: char = '_';
/// Arbitrary intervening text.
pub const WILDCARD: char = '…';
/// Repetition of the matched segment.
pub const GEMINATION: char = '²';
/// Replacement that reverses the matched text.
pub const METATHESIS: &str = r"\\";
/// Start of a gloss in input text.
pub const GLOSS_SEPARATOR: char = '‣';

const OPTIONAL_OPEN: char = '(';
const OPTIONAL_CLOSE: char = ')';
const NONCE_OPEN: char = '[';
const NONCE_CLOSE: char = ']';

/// The four textual fields of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Fields {
    /// Text to be changed.
    pub target: String,
    /// What the target becomes.
    pub replacement: String,
    /// Where the change applies; `_` marks the target.
    pub environment: String,
    /// Where the change does not apply; empty for none.
    pub exception: String,
}

impl Fields {
    /// Fields without an exception.
    pub fn new(
        target: impl Into<String>,
        replacement: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            replacement: replacement.into(),
            environment: environment.into(),
            exception: String::new(),
        }
    }

    /// Sets the exception field.
    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = exception.into();
        self
    }

    /// Splits rule text on `/`.
    ///
    /// Trailing empty fields are dropped before counting, so `p/b/` is as
    /// malformed as `p/b`. Fields after the exception are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
        while parts.last().is_some_and(|p| p.is_empty()) {
            parts.pop();
        }
        if parts.len() < 3 {
            return Err(RuleError::Syntax { found: parts.len() });
        }
        if parts.len() > 4 {
            tracing::warn!(
                rule = text,
                ignored = parts.len() - 4,
                "ignoring fields after the exception"
            );
        }

        Ok(Self {
            target: parts[0].to_string(),
            replacement: parts[1].to_string(),
            environment: parts[2].to_string(),
            exception: parts.get(3).map(|s| s.to_string()).unwrap_or_default(),
        })
    }

    /// Applies `f` to each field in order: target, replacement, environment, exception.
    pub(crate) fn map(self, mut f: impl FnMut(String) -> String) -> Self {
        Self {
            target: f(self.target),
            replacement: f(self.replacement),
            environment: f(self.environment),
            exception: f(self.exception),
        }
    }
}

impl FromStr for Fields {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.target, self.replacement, self.environment)?;
        if !self.exception.is_empty() {
            write!(f, "/{}", self.exception)?;
        }
        Ok(())
    }
}

/// Replaces each `[...]` span in `field` with the name of a new category whose
/// values are the span's characters, adding that category to `categories`.
///
/// Identical spans share one category. An unmatched `[` ends the scan and
/// leaves the rest of the field literal.
pub(crate) fn extract_nonce(field: String, categories: &mut CategorySet) -> String {
    let mut field = field;
    loop {
        let Some(open) = field.find(NONCE_OPEN) else {
            break;
        };
        let Some(close) = field[open..].find(NONCE_CLOSE).map(|i| open + i) else {
            break;
        };

        let span = field[open..=close].to_string();
        let name = categories.nonce_name();
        let interior = &span[NONCE_OPEN.len_utf8()..span.len() - NONCE_CLOSE.len_utf8()];
        match Category::from_chars(name.clone(), interior) {
            Ok(category) => categories.insert(category),
            Err(_) => break,
        }
        field = field.replace(&span, &name);
    }
    field
}

/// Every variant of `field` with each `(...)` element either dropped or kept.
///
/// Innermost elements are resolved first, so optionals may nest. The variant
/// with an element dropped comes before the one with it kept. An unmatched
/// parenthesis stays in the text literally.
///
/// ```rust
/// use soundshift::rule::syntax::expand_optionals;
///
/// assert_eq!(expand_optionals("V(S)_"), vec!["V_", "VS_"]);
/// assert_eq!(expand_optionals("a(b(c))"), vec!["a", "ab", "abc"]);
/// assert_eq!(expand_optionals("a(b"), vec!["a(b"]);
/// ```
pub fn expand_optionals(field: &str) -> Vec<String> {
    let mut variants = Vec::new();
    collect_optionals(field, &mut variants);
    variants
}

fn collect_optionals(field: &str, out: &mut Vec<String>) {
    let Some((open, close)) = find_optional(field) else {
        if !out.iter().any(|v| v == field) {
            out.push(field.to_string());
        }
        return;
    };

    let before = &field[..open];
    let inner = &field[open + OPTIONAL_OPEN.len_utf8()..close];
    let after = &field[close + OPTIONAL_CLOSE.len_utf8()..];

    collect_optionals(&format!("{before}{after}"), out);
    collect_optionals(&format!("{before}{inner}{after}"), out);
}

/// Byte offsets of the first `)` that has a `(` before it, and of that `(`.
fn find_optional(field: &str) -> Option<(usize, usize)> {
    let mut from = 0;
    while let Some(rel) = field[from..].find(OPTIONAL_CLOSE) {
        let close = from + rel;
        if let Some(open) = field[..close].rfind(OPTIONAL_OPEN) {
            return Some((open, close));
        }
        from = close + OPTIONAL_CLOSE.len_utf8();
    }
    None
}

/// Every combination of optional-element variants across the four fields,
/// except the one identical to `fields` itself.
pub fn optional_combinations(fields: &Fields) -> Vec<Fields> {
    let targets = expand_optionals(&fields.target);
    let replacements = expand_optionals(&fields.replacement);
    let environments = expand_optionals(&fields.environment);
    let exceptions = expand_optionals(&fields.exception);

    let mut combinations = Vec::new();
    for target in &targets {
        for replacement in &replacements {
            for environment in &environments {
                for exception in &exceptions {
                    let combination = Fields {
                        target: target.clone(),
                        replacement: replacement.clone(),
                        environment: environment.clone(),
                        exception: exception.clone(),
                    };
                    if combination != *fields {
                        combinations.push(combination);
                    }
                }
            }
        }
    }
    combinations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_fields() {
        let fields = Fields::parse("p/b/_").unwrap();
        assert_eq!(fields, Fields::new("p", "b", "_"));
    }

    #[test]
    fn test_parse_exception_and_empty_replacement() {
        let fields = Fields::parse("V//V_V/#_").unwrap();
        assert_eq!(fields.replacement, "");
        assert_eq!(fields.exception, "#_");
    }

    #[test]
    fn test_parse_rejects_short_rules() {
        assert_eq!(Fields::parse(""), Err(RuleError::Syntax { found: 0 }));
        assert_eq!(Fields::parse("pb"), Err(RuleError::Syntax { found: 1 }));
        assert_eq!(Fields::parse("p/b"), Err(RuleError::Syntax { found: 2 }));
        assert_eq!(Fields::parse("p/b/"), Err(RuleError::Syntax { found: 2 }));
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let fields = Fields::parse("a/b/_/c/d").unwrap();
        assert_eq!(fields.exception, "c");
    }

    #[test]
    fn test_display() {
        assert_eq!(Fields::parse("p/b/_").unwrap().to_string(), "p/b/_");
        assert_eq!(Fields::parse("t/d/_/#_").unwrap().to_string(), "t/d/_/#_");
    }

    #[test]
    fn test_extract_nonce() {
        let mut set = CategorySet::new(&[]);
        let field = extract_nonce("_[aeiou]".to_string(), &mut set);
        assert_eq!(field, "_NONCECATEGORY0");
        let category = &set.as_slice()[0];
        assert_eq!(category.values(), &["a", "e", "i", "o", "u"]);
    }

    #[test]
    fn test_extract_nonce_several_spans() {
        let mut set = CategorySet::new(&[]);
        let field = extract_nonce("[ab]_[cd]".to_string(), &mut set);
        assert_eq!(field, "NONCECATEGORY0_NONCECATEGORY1");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_extract_nonce_unmatched_bracket_is_literal() {
        let mut set = CategorySet::new(&[]);
        assert_eq!(extract_nonce("_[ab".to_string(), &mut set), "_[ab");
        assert!(set.is_empty());
    }

    #[test]
    fn test_expand_optionals_two_elements() {
        let variants = expand_optionals("V(S)_(m)V");
        assert_eq!(variants, vec!["V_V", "V_mV", "VS_V", "VS_mV"]);
    }

    #[test]
    fn test_expand_optionals_stray_close_paren() {
        assert_eq!(expand_optionals("a)b(c)"), vec!["a)b", "a)bc"]);
    }

    #[test]
    fn test_expand_optionals_deduplicates() {
        assert_eq!(expand_optionals("a()b"), vec!["ab"]);
    }

    #[test]
    fn test_optional_combinations_exclude_baseline() {
        let fields = Fields::new("S", "Z", "V(S)_V");
        let combos = optional_combinations(&fields);
        assert_eq!(combos.len(), 2);
        assert!(combos.iter().all(|c| c != &fields));

        let plain = Fields::new("p", "b", "_");
        assert!(optional_combinations(&plain).is_empty());
    }
}
