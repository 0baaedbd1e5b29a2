//! Diagnostic logging.
//!
//! All diagnostics go to stderr through `tracing`, so stdout stays reserved
//! for usage and version text. Verbosity is controlled with `SYSMENU_LOG`
//! using `tracing-subscriber` filter directives (e.g. `SYSMENU_LOG=debug`).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "SYSMENU_LOG";

/// Directives used when `SYSMENU_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVES: &str = "warn";

/// Build the filter from `SYSMENU_LOG`, falling back to warnings only.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global stderr subscriber.
pub fn init() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
