//! Environment Canada citypage client
//!
//! Fetches the MSC Datamart citypage XML for a site and parses it into a
//! [`SiteData`] document. No API key is required.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::SiteData;

/// Base URL for the MSC Datamart citypage feed
const CITYPAGE_BASE_URL: &str = "https://dd.weather.gc.ca/citypage_weather/xml";

/// Request timeout for a single poll
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors that can occur while retrieving a citypage document
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse the XML document
    #[error("Failed to parse citypage XML: {0}")]
    ParseError(#[from] quick_xml::DeError),

    /// Failed to read a local document
    #[error("Failed to read citypage file: {0}")]
    Io(#[from] std::io::Error),
}

/// Client for fetching citypage documents
#[derive(Debug, Clone)]
pub struct CitypageClient {
    client: Client,
    base_url: String,
}

impl Default for CitypageClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CitypageClient {
    /// Create a new CitypageClient with default settings
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self::with_client(client)
    }

    /// Create a new CitypageClient with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: CITYPAGE_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different mirror or proxy
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builds the English citypage URL for a site
    ///
    /// # Arguments
    /// * `prov_code` - Two-letter province code, e.g. "ON"
    /// * `site_code` - Site identifier, e.g. "s0000458"
    pub fn site_url(&self, prov_code: &str, site_code: &str) -> String {
        format!(
            "{}/{}/{}_e.xml",
            self.base_url.trim_end_matches('/'),
            prov_code.to_uppercase(),
            site_code
        )
    }

    /// Fetch and parse the citypage document for a site
    ///
    /// # Returns
    /// * `Ok(SiteData)` - The parsed document, possibly with missing fields
    /// * `Err(FetchError)` - If the request fails or the XML is not well formed
    pub async fn fetch_site(&self, prov_code: &str, site_code: &str) -> Result<SiteData, FetchError> {
        let url = self.site_url(prov_code, site_code);
        debug!(%url, "fetching citypage");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let text = response.text().await?;

        Ok(SiteData::from_xml(&text)?)
    }
}

/// Read and parse a citypage document from disk
pub async fn read_site_file(path: &Path) -> Result<SiteData, FetchError> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(SiteData::from_xml(&text)?)
}
