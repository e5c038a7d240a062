//! Property-based tests for expansion and application.
//!
//! # Properties Tested
//!
//! 1. **Expansion cardinality**: a template with `n` tokens of a category of
//!    size `k` expands to exactly `k^n` strings.
//! 2. **Identity**: text with no occurrence of a rule's pattern is unchanged,
//!    and a template without tokens expands to itself.
//! 3. **Single rewrite**: every occurrence is rewritten exactly once, even when
//!    the replacement contains the pattern.
//! 4. **Idempotence**: a rule whose replacement cannot feed its own pattern
//!    changes nothing on a second pass.
//! 5. **Gloss passthrough**: text after `‣` is never touched.

use proptest::prelude::*;

use super::Rule;
use crate::category::Category;

// ========================================================================
// Generators
// ========================================================================

/// Templates built from the token `C` and lowercase literals.
fn arb_template() -> impl Strategy<Value = (String, usize)> {
    prop::collection::vec(prop_oneof![Just(None), "[a-z]".prop_map(Some)], 0..6).prop_map(
        |parts| {
            let tokens = parts.iter().filter(|p| p.is_none()).count();
            let template: String = parts
                .into_iter()
                .map(|p| p.unwrap_or_else(|| "C".to_string()))
                .collect();
            (template, tokens)
        },
    )
}

/// Distinct lowercase values for a category.
fn arb_values() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,2}", 1..4).prop_map(|set| set.into_iter().collect())
}

/// Words made of lowercase letters and spaces.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-z ]{0,24}"
}

// ========================================================================
// Property 1: Expansion cardinality
// ========================================================================

proptest! {
    #[test]
    fn prop_expansion_cardinality((template, tokens) in arb_template(), values in arb_values()) {
        let category = Category::new("C", values.clone()).unwrap();
        let expanded = category.expand(&template);
        prop_assert_eq!(expanded.len(), values.len().pow(tokens as u32));
        prop_assert!(expanded.iter().all(|e| !e.contains('C')));
    }

    #[test]
    fn prop_expansion_without_tokens_is_identity(template in "[a-z]{0,10}", values in arb_values()) {
        let category = Category::new("C", values).unwrap();
        prop_assert_eq!(category.expand(&template), vec![template]);
    }
}

// ========================================================================
// Property 2: Identity on non-matching text
// ========================================================================

proptest! {
    #[test]
    fn prop_no_match_is_identity(text in "[a-oq-z ]{0,24}") {
        let rule: Rule = "p/b/_".parse().unwrap();
        prop_assert_eq!(rule.apply(&text), text);
    }
}

// ========================================================================
// Property 3: Every occurrence rewritten once
// ========================================================================

proptest! {
    #[test]
    fn prop_each_occurrence_rewritten_once(text in arb_text()) {
        let rule: Rule = "a/aa/_".parse().unwrap();
        let output = rule.apply(&text);
        let count = text.matches('a').count();
        prop_assert_eq!(output.matches('a').count(), 2 * count);
        prop_assert_eq!(output.len(), text.len() + count);
    }
}

// ========================================================================
// Property 4: Idempotence
// ========================================================================

proptest! {
    #[test]
    fn prop_non_feeding_rule_is_idempotent(text in arb_text()) {
        let rule: Rule = "a/b/_".parse().unwrap();
        let once = rule.apply(&text);
        prop_assert!(!once.contains('a'));
        prop_assert_eq!(rule.apply(&once), once);
    }

    #[test]
    fn prop_application_is_deterministic(text in arb_text()) {
        let categories = vec![
            Category::from_chars("S", "ptk").unwrap(),
            Category::from_chars("Z", "bdg").unwrap(),
            Category::from_chars("V", "aeiou").unwrap(),
        ];
        let rule = Rule::compile("S/Z/V_V", &categories).unwrap();
        prop_assert_eq!(rule.apply(&text), rule.apply(&text));
    }
}

// ========================================================================
// Property 5: Gloss passthrough
// ========================================================================

proptest! {
    #[test]
    fn prop_gloss_untouched(body in arb_text(), gloss in "[a-z ]{0,12}") {
        let rule: Rule = "a/o/_".parse().unwrap();
        let input = format!("{body}‣{gloss}");
        let output = rule.apply(&input);
        let expected_gloss = format!("‣{}", gloss);
        prop_assert!(output.ends_with(&expected_gloss));
        prop_assert_eq!(output.len(), input.len());
    }
}
