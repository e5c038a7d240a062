//! Categories: named sets of interchangeable literal strings.
//!
//! A category's name is a token that may appear inside rule templates. Expanding
//! a template substitutes every occurrence of the token with each of the
//! category's values, producing every concrete string the template can stand
//! for.
//!
//! # Expansion order
//!
//! [`Category::expand`] treats the occurrences of its token as the digits of a
//! little-endian mixed-radix counter in base `values.len()`: the first
//! occurrence varies fastest. A template containing the token `n` times
//! expands into exactly `values.len().pow(n)` strings.
//!
//! ```rust
//! use soundshift::category::Category;
//!
//! let t = Category::new("T", ["a", "b"]).unwrap();
//! assert_eq!(t.expand("TT"), vec!["aa", "ba", "ab", "bb"]);
//! assert_eq!(t.expand("x"), vec!["x"]);
//! ```
//!
//! # Working lists
//!
//! Rules never scan against a caller's list directly. A [`CategorySet`] is a
//! per-rule working copy kept in descending name-length order, so that a
//! longer name (`Vowels`) is always recognised before a shorter one that is a
//! prefix of it (`V`).

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::error::CategoryError;

/// Name of the built-in word-boundary category.
pub const BOUNDARY: &str = "#";

/// Whitespace the boundary category stands for.
const BOUNDARY_VALUES: [&str; 5] = [" ", "\t", "\n", "\r", "\x0C"];

/// Prefix of the names given to inline (`[...]`) categories.
pub const NONCE_PREFIX: &str = "NONCECATEGORY";

/// Nesting bound for re-expansion of values that contain category names.
const MAX_EXPANSION_DEPTH: usize = 64;

/// A named, ordered list of literal values.
///
/// Duplicated values are allowed and order is significant: positional
/// correspondence between categories (`S/Z/_` maps the k-th value of `S` to the
/// k-th value of `Z`) depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "CategoryDef", into = "CategoryDef")
)]
pub struct Category {
    name: String,
    values: Vec<String>,
}

impl Category {
    /// Creates a category, rejecting an empty name.
    pub fn new<N, I, V>(name: N, values: I) -> Result<Self, CategoryError>
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(CategoryError::EmptyName);
        }
        Ok(Self {
            name,
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Creates a category with one value per character of `chars`.
    pub fn from_chars(name: impl Into<String>, chars: &str) -> Result<Self, CategoryError> {
        Self::new(name, chars.chars().map(String::from))
    }

    /// The built-in `#` category matching word and utterance boundaries.
    pub fn boundary() -> Self {
        Self {
            name: BOUNDARY.to_string(),
            values: BOUNDARY_VALUES.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// The token that stands for this category inside templates.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The category's values, in order.
    #[inline]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Checks that the definition form written by `Display` reads back as this
    /// category.
    ///
    /// Values must be non-empty and free of `,`, `/` and whitespace. The name
    /// must not contain `=` or `/`, start with `!`, or carry outer whitespace.
    pub fn check_definable(&self) -> Result<(), CategoryError> {
        let name = self.name.as_str();
        if name.contains(|c| c == '=' || c == '/') || name.starts_with('!') || name.trim() != name {
            return Err(CategoryError::ReservedName {
                name: self.name.clone(),
            });
        }
        let reserved = |c: char| c == ',' || c == '/' || c.is_whitespace();
        match self.values.iter().find(|v| v.is_empty() || v.contains(reserved)) {
            Some(value) => Err(CategoryError::ReservedValue {
                name: self.name.clone(),
                value: value.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Number of non-overlapping occurrences of this category's token.
    pub fn occurrences(&self, template: &str) -> usize {
        template.matches(self.name.as_str()).count()
    }

    /// Expands every occurrence of this category's token in `template`.
    ///
    /// Returns `[template]` unchanged when the token does not occur, and an
    /// empty list when it does but the category has no values.
    pub fn expand(&self, template: &str) -> Vec<String> {
        let positions: SmallVec<[usize; 8]> = template
            .match_indices(self.name.as_str())
            .map(|(i, _)| i)
            .collect();

        if positions.is_empty() {
            return vec![template.to_string()];
        }
        let radix = self.values.len();
        if radix == 0 {
            return Vec::new();
        }

        let mut digits: SmallVec<[usize; 8]> = SmallVec::from_elem(0, positions.len());
        let mut output = Vec::new();
        loop {
            output.push(self.instantiate(template, &positions, &digits));

            // Little-endian increment; a carry out of the last digit ends the count.
            let mut carried = true;
            for digit in digits.iter_mut() {
                *digit += 1;
                if *digit < radix {
                    carried = false;
                    break;
                }
                *digit = 0;
            }
            if carried {
                break;
            }
        }
        output
    }

    fn instantiate(&self, template: &str, positions: &[usize], digits: &[usize]) -> String {
        let mut out = String::with_capacity(template.len());
        let mut cursor = 0;
        for (&pos, &digit) in positions.iter().zip(digits) {
            out.push_str(&template[cursor..pos]);
            out.push_str(&self.values[digit]);
            cursor = pos + self.name.len();
        }
        out.push_str(&template[cursor..]);
        out
    }
}

impl fmt::Display for Category {
    /// Writes the definition form, `NAME=v1,v2,...`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.values.join(","))?;
        // A lone multi-character value would otherwise read back as one value per char.
        match self.values.as_slice() {
            [only] if only.chars().count() > 1 => f.write_str(","),
            _ => Ok(()),
        }
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    /// Parses a definition line such as `V=aeiou`, `S=p,t,k` or `C=th sh ch`.
    ///
    /// Values are comma-separated if the right-hand side contains a comma,
    /// whitespace-separated if it contains whitespace, and one per character
    /// otherwise.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (name, values) = line
            .split_once('=')
            .ok_or_else(|| CategoryError::MissingDefinition {
                line: line.to_string(),
            })?;
        let name = name.trim();
        let values = values.trim();

        if values.contains(',') {
            Self::new(
                name,
                values.split(',').map(str::trim).filter(|v| !v.is_empty()),
            )
        } else if values.contains(char::is_whitespace) {
            Self::new(name, values.split_whitespace())
        } else {
            Self::from_chars(name, values)
        }
    }
}

#[cfg(feature = "serialization")]
#[derive(serde::Serialize, serde::Deserialize)]
struct CategoryDef {
    name: String,
    values: Vec<String>,
}

#[cfg(feature = "serialization")]
impl TryFrom<CategoryDef> for Category {
    type Error = CategoryError;

    fn try_from(def: CategoryDef) -> Result<Self, Self::Error> {
        let category = Category::new(def.name, def.values)?;
        category.check_definable()?;
        Ok(category)
    }
}

#[cfg(feature = "serialization")]
impl From<Category> for CategoryDef {
    fn from(category: Category) -> Self {
        CategoryDef {
            name: category.name,
            values: category.values,
        }
    }
}

/// Expands every category token in `template` until none remain.
///
/// Each candidate is expanded by the longest category name it contains; every
/// category sharing that name contributes its own expansion, so a name defined
/// twice stands for the union of both definitions. Values that themselves
/// contain category names are expanded in turn.
///
/// The result is in value order and may contain duplicates.
pub fn expand_all(categories: &[Category], template: &str) -> Vec<String> {
    let mut output = Vec::new();
    expand_into(categories, template.to_string(), 0, &mut output);
    output
}

fn expand_into(categories: &[Category], candidate: String, depth: usize, out: &mut Vec<String>) {
    let Some(name) = longest_name_in(categories, &candidate) else {
        out.push(candidate);
        return;
    };

    if depth >= MAX_EXPANSION_DEPTH {
        tracing::warn!(
            template = %candidate,
            category = name,
            "category expansion does not terminate; leaving token unexpanded"
        );
        out.push(candidate);
        return;
    }

    for category in categories.iter().filter(|c| c.name == name) {
        for variant in category.expand(&candidate) {
            expand_into(categories, variant, depth + 1, out);
        }
    }
}

fn longest_name_in<'a>(categories: &'a [Category], template: &str) -> Option<&'a str> {
    categories
        .iter()
        .filter(|c| template.contains(c.name.as_str()))
        .fold(None, |best: Option<&'a str>, c| match best {
            Some(b) if b.len() >= c.name.len() => Some(b),
            _ => Some(c.name.as_str()),
        })
}

/// One category token found by [`CategorySet::scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Byte offset of the token in the scanned template.
    pub start: usize,
    /// Byte offset one past the token.
    pub end: usize,
    /// Index of the category in the set.
    pub category: usize,
}

/// A working list of categories, ordered by descending name length.
///
/// Insertion keeps the order stable, so among equally long names the earlier
/// definition is found first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    categories: Vec<Category>,
}

impl CategorySet {
    /// Creates a working copy of `categories`.
    pub fn new(categories: &[Category]) -> Self {
        let mut set = Self {
            categories: categories.to_vec(),
        };
        set.sort();
        set
    }

    /// Adds a category and restores name-length order.
    pub fn insert(&mut self, category: Category) {
        self.categories.push(category);
        self.sort();
    }

    fn sort(&mut self) {
        self.categories
            .sort_by(|a, b| b.name.len().cmp(&a.name.len()));
    }

    /// The categories in scan order.
    #[inline]
    pub fn as_slice(&self) -> &[Category] {
        &self.categories
    }

    /// Category at `index`, as reported by [`Token::category`].
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// Number of categories in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the set holds no categories.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Whether some category in the set is called `name`.
    pub fn contains_name(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    /// A fresh name for an inline category: `NONCECATEGORY<k>`, probing upward
    /// from the current set size until the name is unused.
    pub fn nonce_name(&self) -> String {
        let taken: FxHashSet<&str> = self.categories.iter().map(|c| c.name.as_str()).collect();
        let mut k = self.categories.len();
        loop {
            let name = format!("{NONCE_PREFIX}{k}");
            if !taken.contains(name.as_str()) {
                return name;
            }
            k += 1;
        }
    }

    /// Finds category tokens left to right, longest name first at each position.
    pub fn scan(&self, template: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < template.len() {
            let rest = &template[pos..];
            let hit = self
                .categories
                .iter()
                .position(|c| rest.starts_with(c.name.as_str()));
            match hit {
                Some(index) => {
                    let end = pos + self.categories[index].name.len();
                    tokens.push(Token {
                        start: pos,
                        end,
                        category: index,
                    });
                    pos = end;
                }
                None => pos += rest.chars().next().map_or(1, char::len_utf8),
            }
        }
        tokens
    }

    /// Whether `template` contains any category token.
    pub fn has_tokens(&self, template: &str) -> bool {
        self.categories
            .iter()
            .any(|c| template.contains(c.name.as_str()))
    }

    /// [`expand_all`] against this set.
    pub fn expand_all(&self, template: &str) -> Vec<String> {
        expand_all(&self.categories, template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Category {
        Category::new("T", ["a", "b", "c"]).unwrap()
    }

    #[test]
    fn test_expand_single_occurrence() {
        assert_eq!(abc().expand("T"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_expand_counter_order() {
        let out = abc().expand("TT");
        assert_eq!(out.len(), 9);
        assert_eq!(&out[..4], &["aa", "ba", "ca", "ab"]);
        assert_eq!(out[8], "cc");
    }

    #[test]
    fn test_expand_embedded_occurrences() {
        let out = abc().expand("aTaTa");
        assert_eq!(out.len(), 9);
        for expected in ["aaaaa", "aaaba", "aaaca", "abaaa", "ababa", "abaca", "acaaa", "acaba", "acaca"] {
            assert!(out.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn test_expand_without_token_is_identity() {
        assert_eq!(abc().expand("a"), vec!["a"]);
        assert_eq!(abc().expand(""), vec![""]);
    }

    #[test]
    fn test_expand_empty_category_yields_nothing() {
        let empty = Category::new("E", Vec::<String>::new()).unwrap();
        assert!(empty.expand("xEx").is_empty());
        assert_eq!(empty.expand("xx"), vec!["xx"]);
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(Category::new("", ["a"]), Err(CategoryError::EmptyName));
    }

    #[test]
    fn test_expand_all_prefers_longest_name() {
        let cats = vec![
            Category::from_chars("V", "ae").unwrap(),
            Category::from_chars("Vowels", "io").unwrap(),
        ];
        assert_eq!(expand_all(&cats, "Vowels_"), vec!["i_", "o_"]);
        assert_eq!(expand_all(&cats, "VVowels").len(), 4);
    }

    #[test]
    fn test_expand_all_reexpands_values_naming_categories() {
        let cats = vec![
            Category::from_chars("F", "ae").unwrap(),
            Category::from_chars("N", "FB").unwrap(),
        ];
        assert_eq!(expand_all(&cats, "_N"), vec!["_a", "_e", "_B"]);
    }

    #[test]
    fn test_expand_all_unions_duplicate_names() {
        let cats = vec![
            Category::from_chars("F", "aei").unwrap(),
            Category::from_chars("F", "ou").unwrap(),
        ];
        assert_eq!(expand_all(&cats, "kF"), vec!["ka", "ke", "ki", "ko", "ku"]);
    }

    #[test]
    fn test_expand_all_self_reference_terminates() {
        let cats = vec![Category::new("X", ["aX"]).unwrap()];
        let out = expand_all(&cats, "X");
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_scan_longest_first() {
        let set = CategorySet::new(&[
            Category::from_chars("V", "a").unwrap(),
            Category::from_chars("Vowels", "a").unwrap(),
        ]);
        let tokens = set.scan("VVowelsV");
        let names: Vec<&str> = tokens
            .iter()
            .map(|t| set.get(t.category).unwrap().name())
            .collect();
        assert_eq!(names, vec!["V", "Vowels", "V"]);
        assert_eq!(tokens[1].start, 1);
        assert_eq!(tokens[1].end, 7);
    }

    #[test]
    fn test_scan_handles_multibyte_text() {
        let set = CategorySet::new(&[Category::from_chars("V", "a").unwrap()]);
        let tokens = set.scan("əVə");
        assert_eq!(tokens.len(), 1);
        assert_eq!(&"əVə"[tokens[0].start..tokens[0].end], "V");
    }

    #[test]
    fn test_nonce_name_probes_upward() {
        let mut set = CategorySet::new(&[Category::from_chars("NONCECATEGORY1", "a").unwrap()]);
        assert_eq!(set.nonce_name(), "NONCECATEGORY2");
        set.insert(Category::from_chars("NONCECATEGORY2", "b").unwrap());
        assert_eq!(set.nonce_name(), "NONCECATEGORY3");
    }

    #[test]
    fn test_definition_parsing() {
        let v: Category = "V=aeiou".parse().unwrap();
        assert_eq!(v.values().len(), 5);
        let s: Category = "S = p, t, k".parse().unwrap();
        assert_eq!(s.values(), &["p", "t", "k"]);
        let c: Category = "C=th sh ch".parse().unwrap();
        assert_eq!(c.values(), &["th", "sh", "ch"]);
        assert!(matches!(
            "V".parse::<Category>(),
            Err(CategoryError::MissingDefinition { .. })
        ));
        assert_eq!("=abc".parse::<Category>(), Err(CategoryError::EmptyName));
    }

    #[test]
    fn test_display_round_trips() {
        let s: Category = "S=p,t,k".parse().unwrap();
        assert_eq!(s.to_string(), "S=p,t,k");
        assert_eq!(s.to_string().parse::<Category>().unwrap(), s);

        for category in [
            Category::new("P", [".", "!", "ʔ", "'"]).unwrap(),
            Category::new("C", ["th"]).unwrap(),
            Category::new("E", Vec::<String>::new()).unwrap(),
        ] {
            category.check_definable().unwrap();
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_undefinable_categories_rejected() {
        for values in [vec![",", "."], vec!["a b"], vec![""], vec!["a/b"]] {
            let category = Category::new("P", values).unwrap();
            assert!(matches!(
                category.check_definable(),
                Err(CategoryError::ReservedValue { .. })
            ));
        }
        for name in ["A=B", "!P", " P", "P/Q"] {
            let category = Category::new(name, ["a"]).unwrap();
            assert!(matches!(
                category.check_definable(),
                Err(CategoryError::ReservedName { .. })
            ));
        }
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_deserialize_rejects_reserved_values() {
        let json = r#"{"name":"P","values":[",","."]}"#;
        assert!(serde_json::from_str::<Category>(json).is_err());
    }
}
