//! Logging setup built on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Default filter used when neither the caller nor `STRATA_LOG` provides one.
pub const DEFAULT_FILTER: &str = "info,strata_ui=debug";

/// Environment variable consulted for a filter override.
pub const LOG_ENV: &str = "STRATA_LOG";

/// Install a global fmt subscriber using `STRATA_LOG` or [`DEFAULT_FILTER`].
pub fn init() {
    let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.to_owned());
    init_with_filter(&filter);
}

/// Install a global fmt subscriber with an explicit filter directive.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?}: {err}, falling back to {DEFAULT_FILTER:?}");
        EnvFilter::new(DEFAULT_FILTER)
    });

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .is_err()
    {
        tracing::trace!("global subscriber already installed");
    }
}
