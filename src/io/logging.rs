//! Diagnostic logging setup for the command-line tool

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset and verbose output is off
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Filter used when `RUST_LOG` is unset and verbose output is on
pub const VERBOSE_LOG_FILTER: &str = "info,rxnstats=debug";

/// Pick the fallback filter directive for the requested verbosity
pub const fn fallback_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    }
}

/// Install a stderr fmt subscriber, honouring `RUST_LOG` when set
///
/// Returns false when a global subscriber was already installed.
pub fn init_logging(verbose: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_filter(verbose)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Err(error) = installed {
        tracing::debug!(error = %error, "Tracing subscriber already initialized");
        return false;
    }

    true
}
