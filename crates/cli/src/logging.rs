//! Diagnostic logging for the CLI.
//!
//! Logs go to stderr so `--json` output on stdout stays machine-readable.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable consulted for a filter when no `-v` flag is given.
pub const LOG_ENV: &str = "HOSTDIFF_LOG";

static INIT_ONCE: Once = Once::new();

/// Filter directive for a `-v` count.
pub fn level_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber. Later calls are no-ops.
pub fn init(verbosity: u8) {
    INIT_ONCE.call_once(|| {
        let filter = if verbosity == 0 {
            EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| EnvFilter::new(level_directive(verbosity)))
        } else {
            EnvFilter::new(level_directive(verbosity))
        };
        // A subscriber may already be set (e.g. by a test harness); keep it.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
