//! # soundshift
//!
//! A sound-change applier for historical linguistics and conlanging.
//!
//! Rules are written in the familiar `TARGET/REPLACEMENT/ENVIRONMENT[/EXCEPTION]`
//! notation and compiled against named categories of sounds. A compiled rule
//! rewrites a word in a single pass: every position changes at most once, and
//! no change feeds another within the same rule.
//!
//! ## Example
//!
//! ```rust
//! use soundshift::prelude::*;
//!
//! let set = RuleSet::parse("S=ptk\nZ=bdg\nV=aeiou\nS/Z/V_V\nV//_#").unwrap();
//! let (derivation, errors) = set.compile();
//! assert!(errors.is_empty());
//! assert_eq!(derivation.apply("kita"), "kid");
//! ```
//!
//! ## Notation
//!
//! See [`rule::syntax`] for the reserved markers (`_`, `#`, `(..)`, `[..]`,
//! `…`, `²`, `\\`) and [`category`] for how categories expand.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod derivation;
pub mod error;
pub mod rule;
pub mod ruleset;

/// Interactive REPL for building and testing rule sets
#[cfg(feature = "cli")]
pub mod repl;

/// CLI interface and utilities
#[cfg(feature = "cli")]
pub mod cli;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::category::{Category, CategorySet};
    pub use crate::derivation::{load_rules, Derivation, LineError, LoadedRules, Step};
    pub use crate::error::{CategoryError, RuleError, RuleSetError};
    pub use crate::rule::{Fields, Mapping, Rule};
    pub use crate::ruleset::RuleSet;
}
