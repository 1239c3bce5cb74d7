//! Retrieval of device description documents.

use std::time::Duration;

use crate::device::DeviceDescription;
use crate::error::{DiscoveryError, Result};

/// Fetches and parses the description document found at a device's location.
pub trait DescriptionFetcher: Send + Sync {
    fn fetch_description(&self, location: &str) -> Result<DeviceDescription>;

    /// Fetch with a time budget set by the caller.
    ///
    /// Discovery passes the time left before its deadline. Implementations
    /// without their own request timeout ignore it.
    fn fetch_description_within(&self, location: &str, budget: Duration) -> Result<DeviceDescription> {
        let _ = budget;
        self.fetch_description(location)
    }
}

/// [`DescriptionFetcher`] over HTTP using a blocking reqwest client.
///
/// The timeout given to [`new`](Self::new) applies to
/// [`fetch_description`](DescriptionFetcher::fetch_description). A budget
/// passed to `fetch_description_within` replaces it for that one request.
#[derive(Debug, Clone)]
pub struct HttpDescriptionFetcher {
    http_client: reqwest::blocking::Client,
}

impl HttpDescriptionFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    fn fetch(&self, location: &str, budget: Option<Duration>) -> Result<DeviceDescription> {
        let unreachable = |reason: String| DiscoveryError::Unreachable {
            location: location.to_string(),
            reason,
        };

        let mut request = self.http_client.get(location);
        if let Some(budget) = budget {
            request = request.timeout(budget);
        }

        let response = request
            .send()
            .map_err(|e| unreachable(format!("Failed to fetch device description: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unreachable(format!("Description request returned HTTP {}", status)));
        }

        let xml = response
            .text()
            .map_err(|e| unreachable(format!("Failed to read response body: {}", e)))?;

        DeviceDescription::from_xml(&xml)
    }
}

impl DescriptionFetcher for HttpDescriptionFetcher {
    fn fetch_description(&self, location: &str) -> Result<DeviceDescription> {
        self.fetch(location, None)
    }

    fn fetch_description_within(&self, location: &str, budget: Duration) -> Result<DeviceDescription> {
        self.fetch(location, Some(budget))
    }
}
