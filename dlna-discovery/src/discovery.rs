//! Core discovery logic.
//!
//! A discovery call:
//! 1. Sends one SSDP M-SEARCH for every device type
//! 2. Filters responses down to media renderers with a location
//! 3. Deduplicates responses by USN, first response wins
//! 4. Fetches each candidate's description on its own thread
//! 5. Keeps the devices offering AVTransport
//!
//! Everything happens before a hard deadline. Description fetches still
//! running at the deadline are abandoned; their results are dropped.

use std::collections::HashSet;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::device::DeviceDescription;
use crate::error::{DiscoveryError, Result};
use crate::fetch::{DescriptionFetcher, HttpDescriptionFetcher};
use crate::ssdp::{SsdpClient, SsdpResponse, SsdpSearch};
use crate::{Device, AV_TRANSPORT_SERVICE_TYPE, MEDIA_RENDERER_MARKER};

/// Messages multiplexed onto the engine's channel
enum Event {
    Response(SsdpResponse),
    SearchFinished,
    Described {
        location: String,
        result: Result<DeviceDescription>,
    },
}

/// Discovers DLNA media renderers on the local network.
///
/// The engine holds no state between calls; every [`discover`](Self::discover)
/// performs a fresh search, so concurrent calls are independent.
///
/// # Examples
///
/// ```no_run
/// use dlna_discovery::DiscoveryEngine;
/// use std::time::Duration;
///
/// let engine = DiscoveryEngine::new()?;
/// for device in engine.discover(Duration::from_secs(5))? {
///     println!("{} ({}) at {}", device.name, device.model_name, device.location);
/// }
/// # Ok::<(), dlna_discovery::DiscoveryError>(())
/// ```
#[derive(Clone)]
pub struct DiscoveryEngine {
    searcher: Arc<dyn SsdpSearch>,
    fetcher: Arc<dyn DescriptionFetcher>,
}

impl DiscoveryEngine {
    /// Engine using the real SSDP client and an HTTP description fetcher.
    ///
    /// Each description request may run until the discovery deadline, so a
    /// longer `discover` timeout also gives slow devices longer to answer.
    pub fn new() -> Result<Self> {
        let fetcher = HttpDescriptionFetcher::new(crate::DEFAULT_TIMEOUT)?;
        Ok(Self::with_parts(SsdpClient::new(), fetcher))
    }

    /// Engine over caller-provided search and fetch implementations
    pub fn with_parts(
        searcher: impl SsdpSearch + 'static,
        fetcher: impl DescriptionFetcher + 'static,
    ) -> Self {
        Self {
            searcher: Arc::new(searcher),
            fetcher: Arc::new(fetcher),
        }
    }

    /// Discover renderers, returning once `timeout` has elapsed or every
    /// candidate has been resolved, whichever comes first.
    ///
    /// # Errors
    ///
    /// Only a failure to start the search is an error. Failures of individual
    /// devices are logged and the device is left out of the result.
    pub fn discover(&self, timeout: Duration) -> Result<Vec<Device>> {
        let deadline = Instant::now() + timeout;
        if timeout.is_zero() {
            return Ok(Vec::new());
        }

        let responses = self.searcher.search(timeout)?;
        let (tx, rx) = mpsc::channel::<Event>();

        let listener_tx = tx.clone();
        thread::Builder::new()
            .name("ssdp-listener".to_string())
            .spawn(move || {
                for response in responses {
                    if listener_tx.send(Event::Response(response)).is_err() {
                        return;
                    }
                }
                let _ = listener_tx.send(Event::SearchFinished);
            })
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to spawn SSDP listener: {}", e)))?;

        let mut seen = HashSet::new();
        let mut seen_udns = HashSet::new();
        let mut devices = Vec::new();
        let mut pending = 0usize;
        let mut search_finished = false;

        loop {
            if search_finished && pending == 0 {
                break;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            match rx.recv_timeout(remaining) {
                Ok(Event::Response(response)) => {
                    let Some((key, location)) = candidate(&response) else {
                        continue;
                    };
                    if !seen.insert(key) {
                        tracing::trace!(usn = %response.usn, "dropping duplicate SSDP response");
                        continue;
                    }
                    tracing::debug!(
                        usn = %response.usn,
                        server = response.server.as_deref().unwrap_or("unknown"),
                        %location,
                        "describing renderer candidate"
                    );
                    let budget = deadline.saturating_duration_since(Instant::now());
                    if self.spawn_fetch(location, budget, tx.clone()) {
                        pending += 1;
                    }
                }
                Ok(Event::Described { location, result }) => {
                    pending -= 1;
                    match result {
                        Ok(description) if description.has_service(AV_TRANSPORT_SERVICE_TYPE) => {
                            let device = description.to_device(&location);
                            if !device.udn.is_empty() && !seen_udns.insert(device.udn.clone()) {
                                tracing::debug!(udn = %device.udn, "device already found under another USN");
                                continue;
                            }
                            tracing::info!("Found: {}", device.name);
                            devices.push(device);
                        }
                        Ok(_) => {
                            tracing::debug!(%location, "excluding device without AVTransport service");
                        }
                        Err(e) => {
                            tracing::warn!("Failed to connect to {}: {}", location, e);
                        }
                    }
                }
                Ok(Event::SearchFinished) => search_finished = true,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if pending > 0 {
            tracing::debug!(pending, "discovery deadline reached, abandoning outstanding description fetches");
        }

        Ok(devices)
    }

    /// Start fetching one candidate's description within `budget`; false if
    /// no thread could be spawned
    fn spawn_fetch(&self, location: String, budget: Duration, tx: Sender<Event>) -> bool {
        let fetcher = Arc::clone(&self.fetcher);
        let spawned = thread::Builder::new()
            .name("dlna-describe".to_string())
            .spawn(move || {
                let result = fetcher.fetch_description_within(&location, budget);
                // The receiver is gone once the deadline passed
                let _ = tx.send(Event::Described { location, result });
            });

        if let Err(e) = spawned {
            tracing::warn!("Failed to spawn description fetch: {}", e);
            return false;
        }
        true
    }
}

/// Deduplication key and location of a response worth describing
fn candidate(response: &SsdpResponse) -> Option<(String, String)> {
    if !response.search_target.contains(MEDIA_RENDERER_MARKER) {
        return None;
    }
    let location = response.location.as_deref().map(str::trim).filter(|l| !l.is_empty())?;
    let key = if response.usn.is_empty() {
        location.to_string()
    } else {
        response.usn.clone()
    };
    Some((key, location.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(st: &str, location: Option<&str>, usn: &str) -> SsdpResponse {
        SsdpResponse {
            location: location.map(str::to_string),
            search_target: st.to_string(),
            usn: usn.to_string(),
            server: None,
        }
    }

    #[test]
    fn test_candidate_requires_marker() {
        let r = response(
            "urn:schemas-upnp-org:device:InternetGatewayDevice:1",
            Some("http://192.168.1.1/desc.xml"),
            "uuid:router",
        );
        assert!(candidate(&r).is_none());
    }

    #[test]
    fn test_candidate_requires_location() {
        let r = response("urn:schemas-upnp-org:device:MediaRenderer:1", None, "uuid:tv");
        assert!(candidate(&r).is_none());

        let r = response("urn:schemas-upnp-org:device:MediaRenderer:1", Some("  "), "uuid:tv");
        assert!(candidate(&r).is_none());
    }

    #[test]
    fn test_candidate_keyed_by_usn() {
        let r = response(
            "urn:schemas-upnp-org:device:MediaRenderer:1",
            Some("http://192.168.1.5/desc.xml"),
            "uuid:tv::urn:schemas-upnp-org:device:MediaRenderer:1",
        );
        let (key, location) = candidate(&r).unwrap();
        assert_eq!(key, "uuid:tv::urn:schemas-upnp-org:device:MediaRenderer:1");
        assert_eq!(location, "http://192.168.1.5/desc.xml");
    }

    #[test]
    fn test_candidate_without_usn_keyed_by_location() {
        let r = response(
            "urn:schemas-upnp-org:device:MediaRenderer:1",
            Some("http://192.168.1.5/desc.xml"),
            "",
        );
        let (key, _) = candidate(&r).unwrap();
        assert_eq!(key, "http://192.168.1.5/desc.xml");
    }
}
