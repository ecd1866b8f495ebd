//! probeline - resumable media metadata ingestion
//!
//! Probes every `IDENTIFIER<TAB>LOCATOR` line of an input list with ffprobe
//! and appends the results to a JSON Lines database, skipping identifiers
//! recorded by earlier runs.

use anyhow::Result;
use clap::{Parser, Subcommand};

use probeline_core::{ProgressContext, Verbosity};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "probeline")]
#[command(about = "Resumable media metadata ingestion")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "debug")]
    quiet: bool,

    /// Config file path (default: ./probeline.toml or ~/.config/probeline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Probe every new identifier in the input list
    Run(cmd::run::RunArgs),
    /// Compare the input list against the store without probing
    Status(cmd::status::StatusArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = ProgressContext::new();
    let verbosity = if cli.debug {
        Verbosity::Debug
    } else if cli.quiet {
        Verbosity::Quiet
    } else {
        Verbosity::Normal
    };
    let multi = if progress.is_tty() {
        Some(progress.multi())
    } else {
        None
    };
    probeline_core::init_logging(verbosity, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Run(args) => cmd::run::run(args, &config, &progress),
        Command::Status(args) => cmd::status::run(args, &config),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec!["Input", &config.paths.input.display().to_string()]);
            table.add_row(vec!["Store", &config.paths.store.display().to_string()]);
            table.add_row(vec![
                "Error log",
                &config.paths.error_log.display().to_string(),
            ]);
            table.add_row(vec!["ffprobe", &config.probe.ffprobe.display().to_string()]);
            table.add_row(vec![
                "ffprobe extra args",
                &if config.probe.extra_args.is_empty() {
                    "(none)".to_string()
                } else {
                    config.probe.extra_args.join(" ")
                },
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
