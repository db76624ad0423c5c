//! HTTPS downloads.
//!
//! Provides a small blocking client for fetching the Composer installer and
//! its published signature.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

/// Request timeout for every download.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches resources over HTTP/HTTPS.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher using [`DOWNLOAD_TIMEOUT`].
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("liveproto-setup/", env!("CARGO_PKG_VERSION")))
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch a URL and return the response body.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send()?;

        if !response.status().is_success() {
            bail!("HTTP {} fetching {}", response.status(), url);
        }

        Ok(response.bytes()?.to_vec())
    }
}
