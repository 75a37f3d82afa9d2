//! Seisrelay launcher
//!
//! Usage:
//!     seisrelay --directory xml --directory xml2 --endpoint http://fluentbit:9880/

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use seisrelay::config::{RelayConfig, HTTP_TIMEOUT};
use seisrelay::{check_dirs, Relay};
use seisrelay_convert::JmaBulletinConverter;
use seisrelay_publish::{HttpPublisher, RetryPolicy};
use seisrelay_watch::Dispatcher;

#[derive(Parser, Debug)]
#[command(
    name = "seisrelay",
    version,
    about = "Watches directories for JMA seismic XML bulletins and relays them as JSON over HTTP"
)]
struct Args {
    /// Directories to watch for incoming bulletins (repeatable)
    #[arg(short = 'd', long = "directory", default_value = "xml")]
    directories: Vec<PathBuf>,

    /// HTTP sink endpoint
    #[arg(short = 'e', long, default_value = "http://fluentbit:9880/")]
    endpoint: String,

    /// Enable verbose logging (debug to stderr)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    seisrelay_logging::init_logging(args.verbose)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting seisrelay");

    let config = RelayConfig {
        directories: args.directories,
        endpoint: args.endpoint,
    };

    // Fail fast: no watch is registered unless every directory checks out.
    check_dirs(&config.directories).context("watch directory validation failed")?;

    let client = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;
    let publisher = HttpPublisher::new(config.endpoint.clone(), client, RetryPolicy::DEFAULT);
    let relay = Arc::new(Relay::new(Arc::new(JmaBulletinConverter), publisher));

    // Blocks until the watch primitive fails; there is no natural
    // termination path other than an external signal.
    Dispatcher::new(config.directories).run(relay).await?;
    Ok(())
}
