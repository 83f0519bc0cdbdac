use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use payloads::api_client::{DEFAULT_ADDRESS, DEFAULT_TIMEOUT};

/// Client configuration.
///
/// Environment variables can be set directly or loaded from a .env file in
/// the working directory:
/// - BACKEND_URL: base address of the API (default http://localhost:5888)
/// - REQUEST_TIMEOUT_SECS: per-request timeout (default 10)
/// - DEMO_MODE: serve demo data when the backend fails (default false)
/// - STORAGE_PATH: JSON file for persisted client state; in-memory if unset
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub backend_url: String,
    pub request_timeout: Duration,
    pub demo_mode: bool,
    pub storage_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_ADDRESS.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            demo_mode: false,
            storage_path: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        // silently ignore a missing .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.trim()
                    .parse()
                    .context("REQUEST_TIMEOUT_SECS must be whole seconds")?,
            ),
            None => defaults.request_timeout,
        };
        let demo_mode = match lookup("DEMO_MODE") {
            Some(flag) => parse_flag(&flag)
                .context("DEMO_MODE must be true/false, 1/0 or yes/no")?,
            None => defaults.demo_mode,
        };

        Ok(Self {
            backend_url: lookup("BACKEND_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.backend_url),
            request_timeout,
            demo_mode,
            storage_path: lookup("STORAGE_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised flag value {other:?}"),
    }
}
