//! `probeline status` - compare input list against the store

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use probeline_core::{Plan, Store, fmt_num, plan, read_lines};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Input list (IDENTIFIER<TAB>LOCATOR per line)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Record store (JSON Lines)
    #[arg(short, long)]
    pub store: Option<PathBuf>,
}

pub fn run(args: StatusArgs, config: &Config) -> Result<()> {
    let paths = config.paths.with_overrides(args.input, args.store, None);

    let store = Store::load(&paths.store)
        .with_context(|| format!("failed to load store {}", paths.store.display()))?;
    let lines = read_lines(&paths.input)?;
    let plan = plan(&lines, &store);

    eprintln!("\n{}", plan_table(&plan, &store));
    Ok(())
}

/// Table shared by `status` and `run --dry-run`.
pub fn plan_table(plan: &Plan, store: &Store) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Item").fg(Color::Cyan),
            Cell::new("Count").fg(Color::Cyan),
        ]);

    table.add_row(vec![
        Cell::new(format!("Records in {}", store.path().display())),
        Cell::new(fmt_num(store.len())),
    ]);
    table.add_row(vec![Cell::new("Input lines"), Cell::new(fmt_num(plan.total))]);
    table.add_row(vec![
        Cell::new("Already recorded"),
        Cell::new(fmt_num(plan.recorded)),
    ]);
    table.add_row(vec![
        Cell::new("Pending"),
        Cell::new(fmt_num(plan.pending.len())).fg(if plan.pending.is_empty() {
            Color::Green
        } else {
            Color::Yellow
        }),
    ]);
    table.add_row(vec![
        Cell::new("Repeated in input"),
        Cell::new(fmt_num(plan.repeated)),
    ]);
    table.add_row(vec![
        Cell::new("Malformed"),
        Cell::new(fmt_num(plan.malformed)).fg(if plan.malformed == 0 {
            Color::Reset
        } else {
            Color::Red
        }),
    ]);
    table
}
