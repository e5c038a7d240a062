//! CLI command implementations

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::derivation::Derivation;
use crate::ruleset::RuleSet;

use super::args::{Commands, RuleSetFormat};
use super::detect::{detect_format, format_from_extension};
use super::paths::PersistentConfig;

/// Output options for `apply`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Print every intermediate form
    pub trace: bool,
    /// Print the input word next to each output
    pub show_input: bool,
}

/// Execute a CLI command
pub fn execute(command: Commands, config_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Repl { .. } => {
            bail!("The REPL is started by the binary, not by execute()")
        }
        Commands::Apply {
            words,
            rules,
            input,
            format,
            trace,
            show_input,
        } => {
            let config = PersistentConfig::load_from(config_path)?.merge_with_cli(
                &PersistentConfig {
                    rules_path: rules,
                    show_input: show_input.then_some(true),
                    trace: trace.then_some(true),
                },
            );
            let options = ApplyOptions {
                trace: config.trace.unwrap_or(false),
                show_input: config.show_input.unwrap_or(false),
            };
            cmd_apply(words, config.rules_path, input, format, options)
        }
        Commands::Check { rules, format } => {
            let config = PersistentConfig::load_from(config_path)?.merge_with_cli(
                &PersistentConfig {
                    rules_path: rules,
                    ..PersistentConfig::default()
                },
            );
            cmd_check(config.rules_path, format)
        }
        Commands::Convert {
            input,
            output,
            from_format,
            to_format,
        } => cmd_convert(&input, &output, from_format, to_format),
        Commands::Settings {
            set_rules,
            set_show_input,
            set_trace,
            reset,
        } => cmd_settings(config_path, set_rules, set_show_input, set_trace, reset),
    }
}

/// Load a rule set, detecting its format when not given
pub fn load_rule_set(path: &Path, format: Option<RuleSetFormat>) -> Result<RuleSet> {
    let detection = detect_format(path, format)?;
    tracing::debug!(
        path = %path.display(),
        format = %detection.format,
        method = %detection.method,
        "loading rule set"
    );
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule set: {}", path.display()))?;
    parse_rule_set(&contents, detection.format)
        .with_context(|| format!("Failed to parse rule set: {}", path.display()))
}

/// Parse a rule set from a string in the given format
pub fn parse_rule_set(contents: &str, format: RuleSetFormat) -> Result<RuleSet> {
    Ok(match format {
        RuleSetFormat::Text => RuleSet::parse(contents)?,
        RuleSetFormat::Json => RuleSet::from_json(contents)?,
    })
}

/// Save a rule set; the format defaults to the one implied by the extension
pub fn save_rule_set(set: &RuleSet, path: &Path, format: Option<RuleSetFormat>) -> Result<()> {
    let format = format
        .or_else(|| format_from_extension(path))
        .unwrap_or(RuleSetFormat::Text);
    let contents = match format {
        RuleSetFormat::Text => set.to_string(),
        RuleSetFormat::Json => set.to_json()?,
    };
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write rule set: {}", path.display()))
}

fn require_rules(rules: Option<PathBuf>) -> Result<PathBuf> {
    rules.context("No rule set given. Pass --rules FILE or set one with `soundshift settings --set-rules FILE`")
}

/// Compile a rule set, printing each bad line as a warning
fn compile_reporting(set: &RuleSet) -> Derivation {
    let (derivation, errors) = set.compile();
    for error in &errors {
        eprintln!("{}: {}", "Warning".yellow().bold(), error);
    }
    derivation
}

/// Apply command
fn cmd_apply(
    words: Vec<String>,
    rules: Option<PathBuf>,
    input: Option<PathBuf>,
    format: Option<RuleSetFormat>,
    options: ApplyOptions,
) -> Result<()> {
    let path = require_rules(rules)?;
    let set = load_rule_set(&path, format)?;
    let derivation = compile_reporting(&set);

    let words = if !words.is_empty() {
        words
    } else if let Some(lexicon) = input {
        let contents = std::fs::read_to_string(&lexicon)
            .with_context(|| format!("Failed to read lexicon: {}", lexicon.display()))?;
        contents.lines().map(str::to_string).collect()
    } else {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("Failed to read words from stdin")?
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_derivations(&derivation, &words, options, &mut out)?;
    Ok(())
}

/// Write the result of applying `derivation` to each non-blank word
pub fn write_derivations<W: Write>(
    derivation: &Derivation,
    words: &[String],
    options: ApplyOptions,
    out: &mut W,
) -> io::Result<()> {
    let words: Vec<&str> = words
        .iter()
        .map(|w| w.trim_end_matches('\r'))
        .filter(|w| !w.trim().is_empty())
        .collect();

    if options.trace {
        for word in words {
            writeln!(out, "{}", word.bold())?;
            for step in derivation.trace(word) {
                writeln!(out, "  {} {}  {}", "→".cyan(), step.output, step.rule.dimmed())?;
            }
        }
        return Ok(());
    }

    for (word, output) in words.iter().zip(derivation.apply_all(words.as_slice())) {
        if options.show_input {
            writeln!(out, "{} → {}", word, output)?;
        } else {
            writeln!(out, "{}", output)?;
        }
    }
    Ok(())
}

/// Check command
fn cmd_check(rules: Option<PathBuf>, format: Option<RuleSetFormat>) -> Result<()> {
    let path = require_rules(rules)?;
    let set = load_rule_set(&path, format)?;
    let (derivation, errors) = set.compile();

    println!(
        "{} {} categories, {} rules",
        "Rule set:".bold(),
        set.categories().len(),
        set.rules().len()
    );
    for (i, rule) in derivation.rules().iter().enumerate() {
        println!(
            "  {:>3}. {}  ({} mappings, {} exceptions)",
            i + 1,
            rule,
            rule.mappings().len(),
            rule.exceptions().len()
        );
    }

    if errors.is_empty() {
        println!("{}", "All rules compiled".green());
        Ok(())
    } else {
        for error in &errors {
            println!("  {} {}", "✗".red(), error);
        }
        bail!("{} rule line(s) failed to compile", errors.len())
    }
}

/// Convert command
fn cmd_convert(
    input: &Path,
    output: &Path,
    from_format: Option<RuleSetFormat>,
    to_format: Option<RuleSetFormat>,
) -> Result<()> {
    let set = load_rule_set(input, from_format)?;
    save_rule_set(&set, output, to_format)?;
    println!(
        "{} {} → {}",
        "Converted".green(),
        input.display(),
        output.display()
    );
    Ok(())
}

/// Settings command
fn cmd_settings(
    config_path: Option<&Path>,
    set_rules: Option<PathBuf>,
    set_show_input: Option<bool>,
    set_trace: Option<bool>,
    reset: bool,
) -> Result<()> {
    let mut config = if reset {
        PersistentConfig::default()
    } else {
        PersistentConfig::load_from(config_path)?
    };

    let changed = reset || set_rules.is_some() || set_show_input.is_some() || set_trace.is_some();
    if let Some(path) = set_rules {
        config.rules_path = Some(path);
    }
    if let Some(show) = set_show_input {
        config.show_input = Some(show);
    }
    if let Some(trace) = set_trace {
        config.trace = Some(trace);
    }
    if changed {
        config.save_to(config_path)?;
        println!("{}", "Settings saved".green());
    }

    let rules = config
        .rules_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    println!("{} {}", "Rules:".bold(), rules);
    println!("{} {}", "Show input:".bold(), config.show_input.unwrap_or(false));
    println!("{} {}", "Trace:".bold(), config.trace.unwrap_or(false));
    Ok(())
}
