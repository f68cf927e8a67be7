//! Internal diagnostic channel.
//!
//! Problems inside the logging subsystem (failing sinks, rejected
//! configurations) can never be reported to the code that logged. They are
//! emitted as `tracing` events under [`INTERNAL_TARGET`] instead, and are
//! visible whenever the host installs a subscriber.

use logshim_types::{LogShimError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `tracing` target of every internal event.
pub const INTERNAL_TARGET: &str = "logshim::internal";

/// Environment variable holding the diagnostic filter.
pub const FILTER_ENV: &str = "LOGSHIM_LOG";

/// Filter used when `LOGSHIM_LOG` is unset.
pub const DEFAULT_FILTER: &str = "logshim=warn";

/// Install a stderr subscriber for the diagnostic channel.
///
/// Without an explicit directive the filter comes from `LOGSHIM_LOG`,
/// defaulting to `logshim=warn`. Fails if the process already has a global
/// subscriber.
pub fn init_with_filter(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| LogShimError::Validation(format!("Invalid filter '{directive}': {e}")))?,
        None => EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .map_err(|e| LogShimError::Other(format!("Diagnostics already initialized: {e}")))
}

/// Record a failed write or flush of a target.
pub fn sink_failure(target: &str, error: &LogShimError) {
    tracing::warn!(target: INTERNAL_TARGET, sink = target, "target failed: {error}");
}

/// Record that a new configuration was installed.
pub fn configuration_installed(version: u64, targets: usize, rules: usize) {
    tracing::debug!(target: INTERNAL_TARGET, version, targets, rules, "configuration installed");
}

/// Record a configuration that was rejected; the active one stays in place.
pub fn configuration_rejected(source: &str, error: &LogShimError) {
    tracing::warn!(target: INTERNAL_TARGET, source, "configuration rejected: {error}");
}

/// Record a failed engine initialization attempt.
pub fn initialization_failed(error: &LogShimError) {
    tracing::warn!(target: INTERNAL_TARGET, "initialization failed: {error}");
}
