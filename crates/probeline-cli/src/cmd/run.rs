//! `probeline run` - ingest the input list

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use probeline_core::{
    ErrorLog, Ingestor, ProgressContext, Store, install_signal_handlers, plan, read_lines,
};
use probeline_ffprobe::FfprobeProbe;

use crate::cmd::status::plan_table;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input list (IDENTIFIER<TAB>LOCATOR per line)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Record store (JSON Lines, appended to)
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    /// Error log (appended to)
    #[arg(short, long)]
    pub error_log: Option<PathBuf>,

    /// ffprobe binary
    #[arg(long)]
    pub ffprobe: Option<PathBuf>,

    /// Only process the first N input lines
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,

    /// Show what would be probed without probing or writing
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: RunArgs, config: &Config, progress: &ProgressContext) -> Result<()> {
    let paths = config
        .paths
        .with_overrides(args.input, args.store, args.error_log);

    // 1. Replay the store; corruption aborts before anything is probed
    let store = Store::load(&paths.store)
        .with_context(|| format!("failed to load store {}", paths.store.display()))?;

    // 2. Read input
    let mut lines = read_lines(&paths.input)?;
    if let Some(limit) = args.limit {
        lines.truncate(limit);
    }

    if args.dry_run {
        let plan = plan(&lines, &store);
        for candidate in &plan.pending {
            log::debug!("pending {} {}", candidate.id(), candidate.locator());
        }
        eprintln!("\n{}", plan_table(&plan, &store));
        println!("(dry-run mode, no execution)");
        return Ok(());
    }

    // 3. Error log must be writable before the first item
    let error_log = ErrorLog::open(&paths.error_log)?;

    let probe = FfprobeProbe::new(args.ffprobe.unwrap_or_else(|| config.probe.ffprobe.clone()))
        .with_extra_args(config.probe.extra_args.clone());
    match probe.version() {
        Ok(version) => log::info!("Using {version}"),
        Err(e) => log::warn!(
            "{} is not usable ({e}); every probe will fail",
            probe.program().display()
        ),
    }

    install_signal_handlers().context("failed to install signal handlers")?;

    log::info!(
        "Ingesting {} lines from {} ({} already recorded)",
        lines.len(),
        paths.input.display(),
        store.len()
    );

    // 4. Process
    let mut ingestor = Ingestor::new(store, error_log, probe);
    let summary = ingestor.run(&lines, progress)?;
    summary.log();

    if summary.failed + summary.rejected > 0 {
        log::warn!(
            "{} line(s) need attention, see {}",
            summary.failed + summary.rejected,
            paths.error_log.display()
        );
    }
    Ok(())
}
