//! Interactive REPL for soundshift
//!
//! A Read-Eval-Print Loop for building a rule set one rule at a time and
//! trying it on words as you go.

pub mod command;
pub mod helper;
pub mod highlighter;
pub mod state;

pub use command::{Command, CommandResult};
pub use helper::SoundShiftHelper;
pub use state::ReplState;

/// REPL configuration
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string
    pub prompt: String,
    /// History file path
    pub history_file: Option<std::path::PathBuf>,
    /// Maximum history entries
    pub max_history: usize,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "soundshift> ".to_string(),
            history_file: dirs::home_dir().map(|home| home.join(".soundshift_history")),
            max_history: 1000,
        }
    }
}
