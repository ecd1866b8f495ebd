//! Graceful shutdown between items
//!
//! The first SIGINT/SIGTERM sets a flag that the ingestion loop checks before
//! starting the next line; the record being probed is finished first. A
//! second signal exits immediately.

use std::sync::atomic::{AtomicBool, Ordering};

/// Global shutdown flag
pub fn shutdown_flag() -> &'static AtomicBool {
    static FLAG: AtomicBool = AtomicBool::new(false);
    &FLAG
}

/// Register SIGINT and SIGTERM handlers for [`shutdown_flag`].
pub fn install_signal_handlers() -> std::io::Result<()> {
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        // SAFETY: AtomicBool::swap and process::exit are async-signal-safe
        unsafe {
            signal_hook::low_level::register(signal, || {
                if shutdown_flag().swap(true, Ordering::Relaxed) {
                    std::process::exit(130);
                }
            })?;
        }
    }
    Ok(())
}
