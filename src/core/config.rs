//! Client configuration
//!
//! Holds where the collaborator lives, how long a single request may take and
//! where the session file is kept. The binary fills this from command-line
//! arguments with environment fallbacks (`SHOGI_ENDPOINT`,
//! `SHOGI_TIMEOUT_SECS`, `SHOGI_STATE_DIR`).

use crate::core::error::ConfigError;
use shared::Operation;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Local functions emulator, the default during development
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5001/";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL; each operation is posted to `<endpoint>/<operation>`
    pub endpoint: Url,
    pub request_timeout: Duration,
    /// Directory for `session.json`; `None` uses the user's config dir
    pub state_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            state_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn new(
        endpoint: &str,
        request_timeout: Duration,
        state_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        Ok(ClientConfig {
            endpoint: normalize_endpoint(endpoint)?,
            request_timeout,
            state_dir,
        })
    }

    /// URL a given operation is posted to
    pub fn operation_url(&self, operation: Operation) -> Url {
        // Infallible: the endpoint is a base URL ending in '/'
        self.endpoint
            .join(operation.name())
            .unwrap_or_else(|_| self.endpoint.clone())
    }
}

/// Parse and force a trailing slash so `join` appends instead of replacing
fn normalize_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(endpoint).map_err(|source| ConfigError::Endpoint {
        endpoint: endpoint.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::EndpointNotBase(endpoint.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
