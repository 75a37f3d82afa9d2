//! Runtime configuration for the relay.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-attempt timeout on the shared HTTP client.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolved relay settings, populated from the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Directories watched for incoming bulletins.
    #[serde(default = "default_directories")]
    pub directories: Vec<PathBuf>,

    /// HTTP sink endpoint the topic suffix is appended to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_directories() -> Vec<PathBuf> {
    vec![PathBuf::from("xml")]
}

fn default_endpoint() -> String {
    "http://fluentbit:9880/".to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            directories: default_directories(),
            endpoint: default_endpoint(),
        }
    }
}
