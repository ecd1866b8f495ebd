//! Probeline Core - resumable, deduplicated metadata ingestion
//!
//! Reads `IDENTIFIER<TAB>LOCATOR` lines, probes each locator whose
//! identifier is not yet recorded, and appends the result to a JSON Lines
//! store. Re-running on the same input only retries what failed.

pub mod error;
pub mod error_log;
pub mod ingest;
pub mod input;
pub mod logging;
pub mod model;
pub mod probe;
pub mod progress;
pub mod shutdown;
pub mod store;

// Re-exports for convenience
pub use error::{IngestError, MalformedLine, ProbeError};
pub use error_log::ErrorLog;
pub use ingest::{Ingestor, Outcome, Plan, Summary, plan};
pub use input::{parse_line, read_lines};
pub use logging::{IndicatifLogger, Verbosity, init_logging};
pub use model::{Candidate, IDENTIFIER_LEN, Identifier, Metadata, Record};
pub use probe::Probe;
pub use progress::{ProgressContext, fmt_num};
pub use shutdown::{install_signal_handlers, shutdown_flag};
pub use store::Store;
