//! Remote contact sources.
//!
//! # Responsibility
//! - Define the [`RemoteContactSource`] seam used by the import routine.
//! - Fetch and decode the remote JSON array over HTTP.
//!
//! # Invariants
//! - A non-success HTTP status is an error, never an empty list.
//! - Unknown JSON fields are ignored; missing `name`/`phone`/`email` decode
//!   as `None`.

use super::{ImportError, ImportResult};
use log::{error, info};
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Default endpoint serving the shared demo contact list.
pub const DEFAULT_IMPORT_URL: &str =
    "https://67e2d23197fc65f53537ba62.mockapi.io/simple_contact";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// One record of the remote contact list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteContact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Anything that can produce the remote contact list in one call.
pub trait RemoteContactSource {
    fn fetch(&self) -> ImportResult<Vec<RemoteContact>>;
}

/// Blocking HTTP GET source backed by `ureq`.
#[derive(Debug, Clone)]
pub struct HttpContactSource {
    url: String,
    timeout: Duration,
}

impl HttpContactSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl RemoteContactSource for HttpContactSource {
    fn fetch(&self) -> ImportResult<Vec<RemoteContact>> {
        let started_at = Instant::now();
        info!("event=import_fetch module=import status=start");

        let result = ureq::get(&self.url)
            .timeout(self.timeout)
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, _) => ImportError::HttpStatus(code),
                ureq::Error::Transport(transport) => ImportError::Network(transport.to_string()),
            })
            .and_then(|response| {
                response
                    .into_string()
                    .map_err(|err| ImportError::Network(err.to_string()))
            })
            .and_then(|body| parse_remote_contacts(&body));

        match &result {
            Ok(records) => info!(
                "event=import_fetch module=import status=ok duration_ms={} records={}",
                started_at.elapsed().as_millis(),
                records.len()
            ),
            Err(err) => error!(
                "event=import_fetch module=import status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

/// Decodes the remote response body (a JSON array of contact objects).
pub fn parse_remote_contacts(body: &str) -> ImportResult<Vec<RemoteContact>> {
    serde_json::from_str(body).map_err(|err| ImportError::Parse(err.to_string()))
}
