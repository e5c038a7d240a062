//! CLI interface for soundshift
//!
//! Provides command-line utilities for applying, checking and converting rule sets.

pub mod args;
pub mod commands;
pub mod detect;
pub mod paths;

pub use args::{Cli, Commands, RuleSetFormat};
pub use detect::{detect_format, DetectionMethod, FormatDetection};
pub use paths::{config_dir, PersistentConfig};
