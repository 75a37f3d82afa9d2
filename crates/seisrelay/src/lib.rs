//! Seisrelay - JMA Bulletin Relay
//!
//! Watches directories for seismic XML bulletins fully moved into place,
//! classifies each by name, converts its contents and delivers the JSON
//! payload to an HTTP sink with retrying backoff. A background relay, not a
//! request/response service: failures end up in the log, never at a caller.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub mod config;
pub mod relay;

pub use config::RelayConfig;
pub use relay::Relay;

/// Validate that every watch directory exists and is accessible.
///
/// Called before any watch is registered: a missing directory is a fatal
/// startup error, the relay never starts silently degraded.
pub fn check_dirs(dirs: &[PathBuf]) -> Result<()> {
    for dir in dirs {
        let metadata = std::fs::metadata(dir)
            .with_context(|| format!("watch directory {} is not accessible", dir.display()))?;
        if !metadata.is_dir() {
            bail!("watch path {} is not a directory", dir.display());
        }
    }
    Ok(())
}
