//! Shared logging utilities for Seisrelay binaries.

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str =
    "seisrelay=info,seisrelay_watch=info,seisrelay_convert=info,seisrelay_publish=info";

/// Initialize tracing with a stderr writer.
///
/// `RUST_LOG` overrides the built-in filter; `verbose` widens the default
/// to debug when no override is present. The relay runs in containers and
/// logs to stderr only, collection is the platform's job.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .try_init()
        .map_err(|e| anyhow!("failed to initialize tracing subscriber: {e}"))?;

    Ok(())
}
