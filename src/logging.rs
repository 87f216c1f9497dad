//! Diagnostic logging setup

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `MARQUEE_LOG=marquee=trace`
pub const LOG_ENV: &str = "MARQUEE_LOG";

/// Install the stderr subscriber. `MARQUEE_LOG` wins over `verbose`.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "marquee=debug"
    } else {
        "warn"
    }
}
