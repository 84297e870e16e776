//! Diagnostic logging setup.
//!
//! Library code logs through `tracing`; the binary installs a stderr
//! subscriber filtered by `ALOKAHUB_LOG` (same syntax as `RUST_LOG`).

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "ALOKAHUB_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

fn env_filter(verbose: bool) -> EnvFilter {
    match std::env::var(LOG_ENV_VAR) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ if verbose => EnvFilter::new("alokahub=debug,warn"),
        _ => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
