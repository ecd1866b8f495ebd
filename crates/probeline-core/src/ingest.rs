//! Sequential ingestion loop
//!
//! Every input line ends in exactly one [`Outcome`]:
//!
//! ```text
//! line ──parse──► Rejected
//!   │
//!   └─► Candidate ──in store──► Skipped
//!          │
//!          └─probe─► Recorded (appended to store)
//!                 └► Failed   (error log only, retried next run)
//! ```
//!
//! Per-item errors stay inside one iteration. Only store corruption or a
//! failed append ([`IngestError`]) ends the run early.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;

use crate::error::{IngestError, MalformedLine, ProbeError};
use crate::error_log::ErrorLog;
use crate::input::parse_line;
use crate::model::{Candidate, Record};
use crate::probe::Probe;
use crate::progress::ProgressContext;
use crate::shutdown::shutdown_flag;
use crate::store::Store;

/// Terminal state of one input line.
#[derive(Debug)]
pub enum Outcome {
    Rejected(MalformedLine),
    /// Identifier already in the store (resume path).
    Skipped(Candidate),
    Recorded(Candidate),
    Failed {
        candidate: Candidate,
        error: ProbeError,
    },
}

impl Outcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::Failed { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(err) => write!(f, "{err}"),
            Self::Skipped(c) => write!(f, "skipping {}", c.locator()),
            Self::Recorded(c) => f.write_str(c.locator()),
            Self::Failed { candidate, error } => {
                write!(f, "{} {}: {error}", candidate.id(), candidate.locator())
            }
        }
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Lines handed to the loop
    pub total: usize,
    /// Lines that reached a terminal outcome
    pub processed: usize,
    pub recorded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub rejected: usize,
    /// Stopped early on a shutdown request
    pub interrupted: bool,
    pub elapsed: Duration,
}

impl Summary {
    fn tally(&mut self, outcome: &Outcome) {
        self.processed += 1;
        match outcome {
            Outcome::Rejected(_) => self.rejected += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Recorded(_) => self.recorded += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn log(&self) {
        log::info!("=== Ingestion Summary ===");
        log::info!(
            "Lines: {}/{} processed{}",
            self.processed,
            self.total,
            if self.interrupted { " (interrupted)" } else { "" }
        );
        log::info!(
            "Recorded: {}, skipped: {}, failed: {}, malformed: {}",
            self.recorded,
            self.skipped,
            self.failed,
            self.rejected
        );
        log::info!("Time: {:.1}s", self.elapsed.as_secs_f64());
    }
}

/// Owns the store, error log and probe for one run.
pub struct Ingestor<P> {
    store: Store,
    error_log: ErrorLog,
    probe: P,
    shutdown: &'static AtomicBool,
}

impl<P: Probe> Ingestor<P> {
    pub fn new(store: Store, error_log: ErrorLog, probe: P) -> Self {
        Self {
            store,
            error_log,
            probe,
            shutdown: shutdown_flag(),
        }
    }

    /// Use `flag` instead of the process-wide shutdown flag.
    pub fn with_shutdown_flag(mut self, flag: &'static AtomicBool) -> Self {
        self.shutdown = flag;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Resolve one input line to its terminal outcome.
    pub fn process_line(&mut self, line: &str) -> Result<Outcome, IngestError> {
        let candidate = match parse_line(line) {
            Ok(candidate) => candidate,
            Err(err) => {
                self.error_log.record(&format!("{line}: {err}"));
                return Ok(Outcome::Rejected(err));
            }
        };

        if self.store.contains(candidate.id().as_str()) {
            return Ok(Outcome::Skipped(candidate));
        }

        match self.probe.probe(candidate.locator()) {
            Ok(metadata) => {
                self.store.append(Record::new(candidate.clone(), metadata))?;
                Ok(Outcome::Recorded(candidate))
            }
            Err(error) => {
                self.error_log.record(&format!(
                    "{} {}: {error}",
                    candidate.id(),
                    candidate.locator()
                ));
                Ok(Outcome::Failed { candidate, error })
            }
        }
    }

    /// Process `lines` in order until exhausted or shutdown is requested.
    pub fn run(
        &mut self,
        lines: &[String],
        progress: &ProgressContext,
    ) -> Result<Summary, IngestError> {
        let start = Instant::now();
        let total = lines.len();
        let mut summary = Summary {
            total,
            ..Summary::default()
        };
        let bar = progress.item_bar(total);

        for (idx, line) in lines.iter().enumerate() {
            if self.shutdown.load(Ordering::Relaxed) {
                log::warn!("Shutdown requested, stopping after {idx}/{total} lines");
                summary.interrupted = true;
                break;
            }

            let outcome = self.process_line(line)?;
            if outcome.is_error() {
                log::error!("{}/{total}: {outcome}", idx + 1);
            } else {
                log::info!("{}/{total}: {outcome}", idx + 1);
            }
            bar.set_message(outcome.to_string());
            bar.inc(1);
            summary.tally(&outcome);
        }

        bar.finish_and_clear();
        summary.elapsed = start.elapsed();
        Ok(summary)
    }
}

/// What a run over `lines` would do, without probing or writing.
#[derive(Debug, Default)]
pub struct Plan {
    pub total: usize,
    pub malformed: usize,
    /// Already in the store
    pub recorded: usize,
    /// New identifiers seen earlier in the same input
    pub repeated: usize,
    /// First occurrence of each new identifier, in input order
    pub pending: Vec<Candidate>,
}

pub fn plan(lines: &[String], store: &Store) -> Plan {
    let mut plan = Plan {
        total: lines.len(),
        ..Plan::default()
    };
    let mut seen = FxHashSet::default();

    for line in lines {
        match parse_line(line) {
            Err(_) => plan.malformed += 1,
            Ok(c) if store.contains(c.id().as_str()) => plan.recorded += 1,
            Ok(c) => {
                if seen.insert(c.id().clone()) {
                    plan.pending.push(c);
                } else {
                    plan.repeated += 1;
                }
            }
        }
    }
    plan
}
