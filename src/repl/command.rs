//! Command parsing and execution
//!
//! Defines all REPL commands and their execution logic.

use super::state::ReplState;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// REPL command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append a rule: rule <TARGET/REPLACEMENT/ENVIRONMENT[/EXCEPTION]>
    Rule {
        /// Rule text as typed
        text: String,
    },
    /// Define a category: cat <NAME=values>
    Category {
        /// Definition text
        definition: String,
    },
    /// List rules with their compiled sizes: rules
    Rules,
    /// List categories: cats
    Categories,
    /// Remove a rule by its number: drop <n>
    Drop {
        /// 1-based rule number
        position: usize,
    },
    /// Remove all rules and categories: clear
    Clear,
    /// Apply the rules to words: apply <word> [word2] ...
    Apply {
        /// Words to change
        words: Vec<String>,
    },
    /// Show each step of a derivation: trace <word>
    Trace {
        /// Word to derive
        word: String,
    },
    /// Load a rule set: load <path>
    Load {
        /// Path to the rule-set file
        path: PathBuf,
    },
    /// Save the rule set: save [path]
    Save {
        /// Path to save to (defaults to the last loaded file)
        path: Option<PathBuf>,
    },
    /// Show help: help [command]
    Help {
        /// Command to describe
        topic: Option<String>,
    },
    /// Exit REPL: exit | quit
    Exit,
}

/// Command result
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Continue REPL
    Continue(String),
    /// Exit REPL
    Exit,
    /// No output
    Silent,
}

impl Command {
    /// Parse command from input string
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(anyhow::anyhow!("Empty command"));
        }

        let (cmd, rest) = input
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((input, ""));
        let args: Vec<&str> = rest.split_whitespace().collect();

        match cmd.to_lowercase().as_str() {
            "rule" | "r" => Self::require(rest, "rule <TARGET/REPLACEMENT/ENVIRONMENT[/EXCEPTION]>")
                .map(|text| Self::Rule { text }),
            "cat" | "category" => Self::require(rest, "cat <NAME=values>")
                .map(|definition| Self::Category { definition }),
            "rules" | "list" => Ok(Self::Rules),
            "cats" | "categories" => Ok(Self::Categories),
            "drop" | "rm" => Self::parse_drop(&args),
            "clear" => Ok(Self::Clear),
            "apply" | "a" => {
                if args.is_empty() {
                    return Err(anyhow::anyhow!("Usage: apply <word> [word2] ..."));
                }
                Ok(Self::Apply {
                    words: args.iter().map(|w| w.to_string()).collect(),
                })
            }
            "trace" | "t" => Self::require(rest, "trace <word>").map(|word| Self::Trace { word }),
            "load" => Self::require(rest, "load <path>").map(|p| Self::Load { path: p.into() }),
            "save" => Ok(Self::Save {
                path: (!rest.is_empty()).then(|| PathBuf::from(rest)),
            }),
            "help" | "?" => Ok(Self::Help {
                topic: args.first().map(|s| s.to_lowercase()),
            }),
            "exit" | "quit" => Ok(Self::Exit),
            other => Err(anyhow::anyhow!(
                "Unknown command: '{}'. Type 'help' for available commands.",
                other
            )),
        }
    }

    fn require(rest: &str, usage: &str) -> Result<String> {
        if rest.is_empty() {
            Err(anyhow::anyhow!("Usage: {}", usage))
        } else {
            Ok(rest.to_string())
        }
    }

    fn parse_drop(args: &[&str]) -> Result<Self> {
        let position = args
            .first()
            .context("Usage: drop <n>")?
            .parse::<usize>()
            .context("Rule number must be a positive integer")?;
        Ok(Self::Drop { position })
    }

    /// Execute the command against the session
    pub fn execute(&self, state: &mut ReplState) -> Result<CommandResult> {
        match self {
            Self::Rule { text } => {
                state.add_rule(text)?;
                let count = state.derivation().len();
                let msg = match state.derivation().rules().last() {
                    Some(rule) if rule.to_string() == *text => format!(
                        "{} rule {} ({} mappings)",
                        "Added".green(),
                        count,
                        rule.mappings().len()
                    ),
                    _ => format!("{} {}", "Added".green(), text),
                };
                Ok(CommandResult::Continue(msg))
            }

            Self::Category { definition } => {
                state.add_category(definition)?;
                let category = state
                    .rule_set()
                    .categories()
                    .last()
                    .map(|c| c.to_string())
                    .unwrap_or_default();
                Ok(CommandResult::Continue(format!(
                    "{} {}",
                    "Defined".green(),
                    category.cyan()
                )))
            }

            Self::Rules => {
                let rules = state.rule_set().rules();
                if rules.is_empty() {
                    return Ok(CommandResult::Continue("No rules".yellow().to_string()));
                }
                let lines: Vec<String> = rules
                    .iter()
                    .enumerate()
                    .map(|(i, rule)| format!("{:>3}. {}", i + 1, rule))
                    .collect();
                let mut output = lines.join("\n");
                for error in state.errors() {
                    output.push_str(&format!("\n{} {}", "✗".red(), error));
                }
                Ok(CommandResult::Continue(output))
            }

            Self::Categories => {
                let categories = state.rule_set().categories();
                if categories.is_empty() {
                    return Ok(CommandResult::Continue(
                        "No categories".yellow().to_string(),
                    ));
                }
                let lines: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
                Ok(CommandResult::Continue(lines.join("\n")))
            }

            Self::Drop { position } => match state.drop_rule(*position) {
                Some(rule) => Ok(CommandResult::Continue(format!(
                    "{} {}",
                    "Dropped".green(),
                    rule
                ))),
                None => Err(anyhow::anyhow!("No rule number {}", position)),
            },

            Self::Clear => {
                state.clear();
                Ok(CommandResult::Continue("Cleared".green().to_string()))
            }

            Self::Apply { words } => {
                let outputs = state.derivation().apply_all(words.as_slice());
                let lines: Vec<String> = words
                    .iter()
                    .zip(outputs)
                    .map(|(word, output)| format!("{} → {}", word, output.bold()))
                    .collect();
                Ok(CommandResult::Continue(lines.join("\n")))
            }

            Self::Trace { word } => {
                let steps = state.derivation().trace(word);
                if steps.is_empty() {
                    return Ok(CommandResult::Continue(format!("{} (unchanged)", word)));
                }
                let mut output = word.bold().to_string();
                for step in steps {
                    output.push_str(&format!(
                        "\n  {} {}  {}",
                        "→".cyan(),
                        step.output,
                        step.rule.dimmed()
                    ));
                }
                Ok(CommandResult::Continue(output))
            }

            Self::Load { path } => {
                state.load(path)?;
                let set = state.rule_set();
                let mut msg = format!(
                    "{} {} ({} categories, {} rules)",
                    "Loaded".green(),
                    path.display(),
                    set.categories().len(),
                    set.rules().len()
                );
                if !state.errors().is_empty() {
                    msg.push_str(&format!(
                        "\n{} {} rule line(s) failed to compile; see 'rules'",
                        "Warning:".yellow(),
                        state.errors().len()
                    ));
                }
                Ok(CommandResult::Continue(msg))
            }

            Self::Save { path } => {
                let path = path
                    .clone()
                    .or_else(|| state.rules_path.clone())
                    .context("No file to save to. Usage: save <path>")?;
                state.save(&path)?;
                Ok(CommandResult::Continue(format!(
                    "{} {}",
                    "Saved".green(),
                    path.display()
                )))
            }

            Self::Help { topic } => {
                let help_text = match topic {
                    Some(topic) => Self::command_help(topic),
                    None => Self::general_help(),
                };
                Ok(CommandResult::Continue(help_text))
            }

            Self::Exit => Ok(CommandResult::Exit),
        }
    }

    fn general_help() -> String {
        format!(
            "{}\n\
             \x20 rule <T/R/E[/X]>   Append a rule\n\
             \x20 cat <NAME=values>  Define a category\n\
             \x20 rules              List rules\n\
             \x20 cats               List categories\n\
             \x20 drop <n>           Remove rule n\n\
             \x20 clear              Remove all rules and categories\n\
             \x20 apply <words..>    Apply the rules\n\
             \x20 trace <word>       Show every step\n\
             \x20 load <path>        Load a rule set (.sc or .json)\n\
             \x20 save [path]        Save the rule set\n\
             \x20 help [command]     Show help\n\
             \x20 exit               Leave the REPL",
            "Commands:".bold()
        )
    }

    fn command_help(topic: &str) -> String {
        match topic {
            "rule" | "r" => "rule TARGET/REPLACEMENT/ENVIRONMENT[/EXCEPTION]\n  \
                _ marks the target, # a word boundary, (x) an optional element,\n  \
                [abc] an inline category, … any text, ² the target repeated,\n  \
                and a replacement of \\\\ reverses the target."
                .to_string(),
            "cat" | "category" => "cat NAME=values\n  \
                Values are comma- or space-separated, otherwise one per character:\n  \
                V=aeiou  S=p,t,k  C=th sh ch"
                .to_string(),
            "apply" | "a" => "apply WORD [WORD..]\n  Text after ‣ in a word is left untouched.".to_string(),
            "trace" | "t" => "trace WORD\n  Lists each rule that changed the word.".to_string(),
            "drop" | "rm" => "drop N\n  Removes rule N as numbered by 'rules'.".to_string(),
            "load" => "load PATH\n  Replaces the session with a rule set file.".to_string(),
            "save" => "save [PATH]\n  Format follows the extension (.json or text).".to_string(),
            other => format!("No help for '{}'. Type 'help' for available commands.", other),
        }
    }
}
