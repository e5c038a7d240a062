//! Rustyline helper integration
//!
//! Provides completion, hinting, highlighting, and validation for the REPL.

use super::highlighter::{CommandHighlighter, COMMANDS};
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};
use std::borrow::Cow;

/// REPL helper
pub struct SoundShiftHelper {
    highlighter: CommandHighlighter,
    hinter: HistoryHinter,
    files: FilenameCompleter,
}

impl SoundShiftHelper {
    /// Create a new helper instance
    pub fn new() -> Self {
        Self {
            highlighter: CommandHighlighter::new(),
            hinter: HistoryHinter::new(),
            files: FilenameCompleter::new(),
        }
    }

    fn complete_command(prefix: &str) -> Vec<Pair> {
        let prefix = prefix.to_lowercase();
        COMMANDS
            .iter()
            .filter(|cmd| cmd.len() > 1 && cmd.starts_with(&prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: format!("{} ", cmd),
            })
            .collect()
    }
}

impl Default for SoundShiftHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Helper for SoundShiftHelper {}

impl Completer for SoundShiftHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let head = &line[..pos];
        let parts: Vec<&str> = head.split_whitespace().collect();

        // Still typing the first word
        if parts.len() <= 1 && !head.ends_with(char::is_whitespace) {
            let start = head.len() - head.trim_start().len();
            return Ok((start, Self::complete_command(parts.first().unwrap_or(&""))));
        }

        match parts[0].to_lowercase().as_str() {
            "load" | "save" => self.files.complete(line, pos, ctx),
            "help" | "?" if parts.len() <= 2 => {
                let start = head.rfind(char::is_whitespace).map(|i| i + 1).unwrap_or(0);
                let prefix = if head.ends_with(char::is_whitespace) {
                    ""
                } else {
                    parts.last().copied().unwrap_or("")
                };
                Ok((start, Self::complete_command(prefix)))
            }
            _ => Ok((0, vec![])),
        }
    }
}

impl Hinter for SoundShiftHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<Self::Hint> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for SoundShiftHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: bool) -> bool {
        self.highlighter.highlight_char(line, pos, forced)
    }
}

impl Validator for SoundShiftHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        // Commands are checked when they run
        Ok(ValidationResult::Valid(None))
    }
}
