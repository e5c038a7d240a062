//! Syntax highlighting for REPL input

use colored::Colorize;
use rustyline::highlight::Highlighter;

use crate::rule::syntax::{CURSOR, FIELD_SEPARATOR, GEMINATION, WILDCARD};

/// Known command words, including aliases
pub(crate) const COMMANDS: &[&str] = &[
    "rule", "r", "cat", "category", "rules", "list", "cats", "categories", "drop", "rm", "clear",
    "apply", "a", "trace", "t", "load", "save", "help", "?", "exit", "quit",
];

/// Command highlighter
#[derive(Debug, Default)]
pub struct CommandHighlighter;

impl CommandHighlighter {
    /// Create a highlighter
    pub fn new() -> Self {
        Self
    }

    fn highlight_command(&self, line: &str) -> String {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];
        let (cmd, rest) = match trimmed.find(char::is_whitespace) {
            Some(at) => trimmed.split_at(at),
            None => (trimmed, ""),
        };

        let lower = cmd.to_lowercase();
        if !COMMANDS.contains(&lower.as_str()) {
            return line.to_string();
        }

        let rest = match lower.as_str() {
            "rule" | "r" => highlight_rule(rest),
            "cat" | "category" => highlight_definition(rest),
            _ => rest.to_string(),
        };
        format!("{}{}{}", indent, cmd.blue().bold(), rest)
    }
}

/// Separators in yellow, markers in magenta
fn highlight_rule(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let mut buf = [0u8; 4];
        let s: &str = c.encode_utf8(&mut buf);
        match c {
            FIELD_SEPARATOR => out.push_str(&s.yellow().to_string()),
            CURSOR | WILDCARD | GEMINATION | '#' => out.push_str(&s.magenta().to_string()),
            '(' | ')' | '[' | ']' => out.push_str(&s.cyan().to_string()),
            _ => out.push(c),
        }
    }
    out
}

fn highlight_definition(text: &str) -> String {
    match text.split_once('=') {
        Some((name, values)) => format!("{}{}{}", name.cyan(), "=".yellow(), values),
        None => text.to_string(),
    }
}

impl Highlighter for CommandHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> std::borrow::Cow<'l, str> {
        std::borrow::Cow::Owned(self.highlight_command(line))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut in_escape = false;
        for c in text.chars() {
            match (in_escape, c) {
                (false, '\u{1b}') => in_escape = true,
                (true, 'm') => in_escape = false,
                (true, _) => {}
                (false, _) => out.push(c),
            }
        }
        out
    }

    #[test]
    fn test_unknown_command_is_untouched() {
        let highlighter = CommandHighlighter::new();
        assert_eq!(highlighter.highlight_command("foo a/b/_"), "foo a/b/_");
    }

    #[test]
    fn test_highlighting_preserves_text() {
        let highlighter = CommandHighlighter::new();
        for line in ["rule S/Z/V(S)_[mn]…#/²", "  cat V=aeiou", "apply kita", "rules"] {
            assert_eq!(strip_ansi(&highlighter.highlight_command(line)), line);
        }
    }
}
