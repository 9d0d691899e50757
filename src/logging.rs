//! Diagnostic logging
//!
//! The audit log records what changed; these `tracing` events are for
//! following what the ledger is doing. Output goes to stderr so it never
//! mixes with command output.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `info`, `pocket_ledger=debug`)
pub const LOG_ENV: &str = "POCKET_LOG";

/// Filter used when `POCKET_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
