//! CLI argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "soundshift")]
#[command(about = "Apply ordered sound changes to words")]
#[command(version)]
pub struct Cli {
    /// Custom configuration file path
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a rule set to words
    Apply {
        /// Words to change (read from --input or stdin when omitted)
        words: Vec<String>,

        /// Rule-set file (defaults to the configured one)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Lexicon file, one word per line
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Rule-set format (auto-detected if not specified)
        #[arg(short = 'f', long)]
        format: Option<RuleSetFormat>,

        /// Print every intermediate form
        #[arg(short, long)]
        trace: bool,

        /// Print the input word next to each output
        #[arg(short = 's', long)]
        show_input: bool,
    },

    /// Compile a rule set and report problems
    Check {
        /// Rule-set file (defaults to the configured one)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Rule-set format (auto-detected if not specified)
        #[arg(short = 'f', long)]
        format: Option<RuleSetFormat>,
    },

    /// Convert a rule set between text and JSON
    Convert {
        /// Input rule-set file
        input: PathBuf,

        /// Output rule-set file
        output: PathBuf,

        /// Input format (auto-detected if not specified)
        #[arg(long)]
        from_format: Option<RuleSetFormat>,

        /// Output format (from the output extension if not specified)
        #[arg(long)]
        to_format: Option<RuleSetFormat>,
    },

    /// Launch interactive REPL
    Repl {
        /// Rule-set file to load
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },

    /// Manage persistent settings
    Settings {
        /// Set the default rule-set file
        #[arg(long)]
        set_rules: Option<PathBuf>,

        /// Set whether `apply` prints inputs by default
        #[arg(long)]
        set_show_input: Option<bool>,

        /// Set whether `apply` traces by default
        #[arg(long)]
        set_trace: Option<bool>,

        /// Reset settings to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// On-disk representation of a rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleSetFormat {
    /// Line-oriented text (`.sc`)
    Text,
    /// JSON document
    Json,
}

impl std::fmt::Display for RuleSetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
