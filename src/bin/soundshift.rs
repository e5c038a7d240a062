//! soundshift - apply ordered sound changes to words
//!
//! Provides CLI utilities and an interactive REPL for building rule sets.

use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process;

use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use soundshift::cli::commands;
use soundshift::cli::paths::PersistentConfig;
use soundshift::cli::{Cli, Commands};
use soundshift::repl::{Command, CommandResult, ReplConfig, ReplState, SoundShiftHelper};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Repl { rules } => run_repl(rules, cli.config.as_deref()),
        command => commands::execute(command, cli.config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `-v`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("soundshift={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_repl(rules: Option<PathBuf>, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = PersistentConfig::load_from(config_path)
        .unwrap_or_default()
        .merge_with_cli(&PersistentConfig {
            rules_path: rules,
            ..PersistentConfig::default()
        });

    print_banner();

    let mut state = ReplState::new();
    if let Some(path) = config.rules_path.as_deref().filter(|p| p.exists()) {
        match state.load(path) {
            Ok(()) => {
                let set = state.rule_set();
                println!(
                    "  Loaded {} ({} categories, {} rules)",
                    path.display().to_string().cyan(),
                    set.categories().len().to_string().green(),
                    set.rules().len().to_string().green()
                );
                for error in state.errors() {
                    eprintln!("  {}: {}", "Warning".yellow(), error);
                }
                println!();
            }
            Err(e) => {
                eprintln!("  {}: Could not load rule set: {:#}", "Warning".yellow(), e);
                println!();
            }
        }
    }

    let repl_config = ReplConfig::default();
    let rustyline_config = Config::builder()
        .auto_add_history(true)
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .max_history_size(repl_config.max_history)?
        .build();

    let mut editor: Editor<SoundShiftHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(rustyline_config)?;
    editor.set_helper(Some(SoundShiftHelper::new()));

    if let Some(history_path) = &repl_config.history_file {
        if history_path.exists() {
            let _ = editor.load_history(history_path);
        }
    }

    loop {
        let prompt = format!(
            "{}[{}]> ",
            "soundshift".bright_cyan().bold(),
            state.derivation().len().to_string().bright_yellow()
        );

        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}: {:?}", "Readline error".red().bold(), err);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match Command::parse(&line).and_then(|command| command.execute(&mut state)) {
            Ok(CommandResult::Continue(output)) => println!("{}", output),
            Ok(CommandResult::Silent) => {}
            Ok(CommandResult::Exit) => break,
            Err(e) => eprintln!("{}: {:#}", "Error".red().bold(), e),
        }
    }

    if let Some(history_path) = &repl_config.history_file {
        if let Err(e) = editor.save_history(history_path) {
            eprintln!("{}: Failed to save history: {}", "Warning".yellow(), e);
        }
    }

    Ok(())
}

fn print_banner() {
    println!();
    println!(
        "{}",
        "═══════════════════════════════════════════════════════".bright_cyan()
    );
    println!(
        "{}",
        "   soundshift - Sound Change Applier".bright_cyan().bold()
    );
    println!(
        "{}",
        "═══════════════════════════════════════════════════════".bright_cyan()
    );
    println!();
    println!("  Version: {}", env!("CARGO_PKG_VERSION").green());
    println!("  Type {} for available commands", "'help'".yellow().bold());
    println!(
        "  Type {} or press {} to exit",
        "'exit'".yellow().bold(),
        "Ctrl+D".yellow().bold()
    );
    println!();
    println!("{}", "  Quick Start:".bold());
    println!("    • Define a category: {}", "cat V=aeiou".cyan());
    println!("    • Add a rule:        {}", "rule p/b/V_V".cyan());
    println!("    • Try it:            {}", "apply apa".cyan());
    println!();
}
