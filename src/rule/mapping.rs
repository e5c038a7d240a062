//! Mapping-table generation.
//!
//! A rule compiles into a flat table of concrete `(pattern, replacement)`
//! pairs. Generation happens in two stages:
//!
//! 1. **Correspondence**: the target and replacement fields are resolved into
//!    concrete target/replacement pairs. Four cases are distinguished:
//!    - *metathesis* (`\\` replacement): each concrete target maps to its reverse;
//!    - *one-to-one* (no category in the target): the fields are used verbatim;
//!    - *many-to-one* (categories only in the target): every concrete target
//!      maps to the literal replacement;
//!    - *many-to-many* (categories on both sides): categories are paired by
//!      order of appearance and values correspond by index, wrapping around
//!      when the replacement category is shorter.
//! 2. **Placement**: each pair is substituted into every concrete environment
//!    at the cursor `_`, and into every concrete exception.
//!
//! ```text
//! S = p t k    Z = b d g    V = a e i o u
//!
//! S/Z/V_V  →  (p,b) (t,d) (k,g)  →  "apa"→"aba", "ape"→"abe", ... "ukuu"...
//! ```

use smallvec::SmallVec;

use super::syntax::{Fields, CURSOR, GEMINATION, METATHESIS};
use crate::category::{CategorySet, Token};

/// One concrete entry of a rule's mapping table.
///
/// The pattern may still contain wildcards (`…`), which are resolved against
/// the text a rule is applied to; the replacement then contains the matching
/// capture slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mapping {
    /// Text to find.
    pub pattern: String,
    /// Text it becomes.
    pub replacement: String,
}

impl Mapping {
    /// Creates a mapping.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Mapping table and exception templates produced for one field combination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Table {
    pub mappings: Vec<Mapping>,
    pub exceptions: Vec<String>,
}

impl Table {
    pub fn extend(&mut self, other: Table) {
        self.mappings.extend(other.mappings);
        for exception in other.exceptions {
            if !self.exceptions.contains(&exception) {
                self.exceptions.push(exception);
            }
        }
    }
}

/// Builds the mapping table for one combination of fields.
///
/// `categories` must already include the boundary category and any inline
/// categories the fields refer to.
pub(crate) fn generate(fields: &Fields, categories: &CategorySet) -> Table {
    let pairs = correspondences(&fields.target, &fields.replacement, categories);

    let environment = if is_bare_gemination(&fields.environment) {
        format!("{CURSOR}{GEMINATION}")
    } else {
        fields.environment.clone()
    };
    let environments = categories.expand_all(&environment);
    let exception_variants = categories.expand_all(&fields.exception);

    let mut exceptions: Vec<String> = Vec::new();
    for variant in &exception_variants {
        for pair in &pairs {
            let exception = place(variant, &pair.pattern, None);
            if !exception.is_empty() && !exceptions.contains(&exception) {
                exceptions.push(exception);
            }
        }
    }

    let mut mappings = Vec::with_capacity(pairs.len() * environments.len());
    for pair in &pairs {
        for environment in &environments {
            mappings.push(Mapping {
                pattern: place(environment, &pair.pattern, Some(&pair.pattern)),
                replacement: place(environment, &pair.replacement, Some(&pair.pattern)),
            });
        }
    }

    Table {
        mappings,
        exceptions,
    }
}

/// Resolves the target and replacement fields into concrete pairs.
pub fn correspondences(target: &str, replacement: &str, categories: &CategorySet) -> Vec<Mapping> {
    if replacement == METATHESIS {
        return categories
            .expand_all(target)
            .into_iter()
            .map(|t| {
                let reversed: String = t.chars().rev().collect();
                Mapping::new(t, reversed)
            })
            .collect();
    }

    if !categories.has_tokens(target) {
        return vec![Mapping::new(target, replacement)];
    }

    if !categories.has_tokens(replacement) {
        return categories
            .expand_all(target)
            .into_iter()
            .map(|t| Mapping::new(t, replacement))
            .collect();
    }

    pair_categories(target, replacement, categories)
}

/// Many-to-many correspondence by order of appearance.
///
/// The i-th category in the target is paired with the i-th category in the
/// replacement; the pairs are the cross product over all pairings, first
/// pairing outermost. Target categories left without a partner are then
/// expanded freely; replacement categories left over stay literal.
fn pair_categories(target: &str, replacement: &str, categories: &CategorySet) -> Vec<Mapping> {
    let target_tokens = categories.scan(target);
    let replacement_tokens = categories.scan(replacement);
    let paired = target_tokens.len().min(replacement_tokens.len());
    let target_tokens = &target_tokens[..paired];
    let replacement_tokens = &replacement_tokens[..paired];

    let mut choices: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new()];
    for token in target_tokens {
        let size = categories
            .get(token.category)
            .map_or(0, |c| c.values().len());
        choices = choices
            .into_iter()
            .flat_map(|prefix| {
                (0..size).map(move |k| {
                    let mut choice = prefix.clone();
                    choice.push(k);
                    choice
                })
            })
            .collect();
    }

    let mut pairs = Vec::new();
    for choice in &choices {
        let Some(pattern) = fill(target, target_tokens, choice, categories, false) else {
            continue;
        };
        let Some(replaced) = fill(replacement, replacement_tokens, choice, categories, true) else {
            continue;
        };
        for concrete in categories.expand_all(&pattern) {
            pairs.push(Mapping::new(concrete, replaced.clone()));
        }
    }
    pairs
}

/// Substitutes the chosen value of each token's category into `template`.
///
/// With `cyclic`, indices wrap around the category's size. Returns `None` when
/// a category has no value to offer.
fn fill(
    template: &str,
    tokens: &[Token],
    choice: &[usize],
    categories: &CategorySet,
    cyclic: bool,
) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut cursor = 0;
    for (token, &k) in tokens.iter().zip(choice) {
        let values = categories.get(token.category)?.values();
        let value = if cyclic && !values.is_empty() {
            &values[k % values.len()]
        } else {
            values.get(k)?
        };
        out.push_str(&template[cursor..token.start]);
        out.push_str(value);
        cursor = token.end;
    }
    out.push_str(&template[cursor..]);
    Some(out)
}

/// Substitutes `text` for the cursor and, when given, `doubled` for the
/// gemination marker, in a single pass.
fn place(template: &str, text: &str, doubled: Option<&str>) -> String {
    let mut out = String::with_capacity(template.len() + text.len());
    for c in template.chars() {
        match (c, doubled) {
            (CURSOR, _) => out.push_str(text),
            (GEMINATION, Some(segment)) => out.push_str(segment),
            _ => out.push(c),
        }
    }
    out
}

fn is_bare_gemination(environment: &str) -> bool {
    let mut chars = environment.chars();
    chars.next() == Some(GEMINATION) && chars.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    fn set(defs: &[&str]) -> CategorySet {
        let mut set = CategorySet::new(
            &defs
                .iter()
                .map(|d| d.parse::<Category>().unwrap())
                .collect::<Vec<_>>(),
        );
        set.insert(Category::boundary());
        set
    }

    fn pairs(mappings: &[Mapping]) -> Vec<(&str, &str)> {
        mappings
            .iter()
            .map(|m| (m.pattern.as_str(), m.replacement.as_str()))
            .collect()
    }

    #[test]
    fn test_one_to_one() {
        let cats = set(&["V=aeiou"]);
        let table = generate(&Fields::new("p", "b", "_"), &cats);
        assert_eq!(pairs(&table.mappings), vec![("p", "b")]);
        assert!(table.exceptions.is_empty());
    }

    #[test]
    fn test_one_to_one_replacement_tokens_stay_literal() {
        let cats = set(&["V=aeiou"]);
        let result = correspondences("p", "V", &cats);
        assert_eq!(pairs(&result), vec![("p", "V")]);
    }

    #[test]
    fn test_many_to_one() {
        let cats = set(&["V=aei"]);
        let result = correspondences("V", "e", &cats);
        assert_eq!(pairs(&result), vec![("a", "e"), ("e", "e"), ("i", "e")]);
    }

    #[test]
    fn test_many_to_many_positional() {
        let cats = set(&["S=ptk", "Z=bdg"]);
        let result = correspondences("S", "Z", &cats);
        assert_eq!(pairs(&result), vec![("p", "b"), ("t", "d"), ("k", "g")]);
    }

    #[test]
    fn test_many_to_many_wraps_short_replacement() {
        let cats = set(&["S=ptkq", "Z=bdg"]);
        let result = correspondences("S", "Z", &cats);
        assert_eq!(result[3], Mapping::new("q", "b"));
    }

    #[test]
    fn test_many_to_many_cross_product_over_pairings() {
        let cats = set(&["S=pt", "Z=bd", "V=ae", "W=iu"]);
        let result = correspondences("SV", "ZW", &cats);
        assert_eq!(
            pairs(&result),
            vec![("pa", "bi"), ("pe", "bu"), ("ta", "di"), ("te", "du")]
        );
    }

    #[test]
    fn test_many_to_many_unpaired_target_expands() {
        let cats = set(&["S=pt", "Z=bd", "V=ae"]);
        let result = correspondences("SV", "Z", &cats);
        assert_eq!(
            pairs(&result),
            vec![("pa", "b"), ("pe", "b"), ("ta", "d"), ("te", "d")]
        );
    }

    #[test]
    fn test_many_to_many_empty_category_yields_nothing() {
        let mut cats = set(&["S=pt"]);
        cats.insert(Category::new("Z", Vec::<String>::new()).unwrap());
        assert!(correspondences("S", "Z", &cats).is_empty());
    }

    #[test]
    fn test_metathesis() {
        let cats = set(&["V=ai"]);
        let result = correspondences("Va", r"\\", &cats);
        assert_eq!(pairs(&result), vec![("aa", "aa"), ("ia", "ai")]);
    }

    #[test]
    fn test_environment_placement() {
        let cats = set(&["V=ae"]);
        let table = generate(&Fields::new("p", "b", "V_"), &cats);
        assert_eq!(pairs(&table.mappings), vec![("ap", "ab"), ("ep", "eb")]);
    }

    #[test]
    fn test_bare_gemination_marker() {
        let cats = set(&[]);
        let table = generate(&Fields::new("m", "", "²"), &cats);
        assert_eq!(pairs(&table.mappings), vec![("mm", "m")]);
    }

    #[test]
    fn test_gemination_uses_original_segment() {
        let cats = set(&[]);
        let table = generate(&Fields::new("t", "d", "_²"), &cats);
        assert_eq!(pairs(&table.mappings), vec![("tt", "dt")]);
    }

    #[test]
    fn test_boundary_environment() {
        let cats = set(&[]);
        let table = generate(&Fields::new("p", "b", "#_"), &cats);
        assert_eq!(table.mappings.len(), 5);
        assert_eq!(table.mappings[0], Mapping::new(" p", " b"));
    }

    #[test]
    fn test_exception_templates() {
        let cats = set(&["V=ae"]);
        let table = generate(&Fields::new("V", "o", "_").with_exception("#_"), &cats);
        assert_eq!(table.exceptions.len(), 10);
        assert!(table.exceptions.contains(&" a".to_string()));
        assert!(table.exceptions.contains(&"\te".to_string()));
    }

    #[test]
    fn test_table_extend_deduplicates_exceptions() {
        let mut a = Table {
            mappings: vec![Mapping::new("a", "b")],
            exceptions: vec![" a".into()],
        };
        a.extend(Table {
            mappings: vec![Mapping::new("c", "d")],
            exceptions: vec![" a".into(), " c".into()],
        });
        assert_eq!(a.mappings.len(), 2);
        assert_eq!(a.exceptions, vec![" a", " c"]);
    }
}
