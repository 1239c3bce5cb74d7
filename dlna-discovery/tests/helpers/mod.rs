//! Test helpers for simulated-network discovery tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use dlna_discovery::{DescriptionFetcher, DeviceDescription, DiscoveryError, SsdpResponse, SsdpSearch};

pub const RENDERER_ST: &str = "urn:schemas-upnp-org:device:MediaRenderer:1";

/// Load a description document from the fixtures directory
pub fn load_fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

/// Description location used for a simulated device at `ip`
pub fn location_for(ip: &str) -> String {
    format!("http://{}:49152/description.xml", ip)
}

/// A search response from a media renderer
pub fn renderer_response(usn: &str, ip: &str) -> SsdpResponse {
    SsdpResponse {
        location: Some(location_for(ip)),
        search_target: RENDERER_ST.to_string(),
        usn: format!("{}::{}", usn, RENDERER_ST),
        server: Some("Linux/4.9 UPnP/1.0 DLNADOC/1.50".to_string()),
    }
}

/// A search response from some other kind of UPnP device
pub fn other_response(st: &str, usn: &str, ip: &str) -> SsdpResponse {
    SsdpResponse {
        location: Some(location_for(ip)),
        search_target: st.to_string(),
        usn: format!("{}::{}", usn, st),
        server: None,
    }
}

/// Search that replays a fixed list of responses, optionally spaced out in time
pub struct ScriptedSearch {
    responses: Vec<SsdpResponse>,
    spacing: Duration,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedSearch {
    pub fn new(responses: Vec<SsdpResponse>) -> Self {
        Self {
            responses,
            spacing: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn spaced(mut self, spacing: Duration) -> Self {
        self.spacing = spacing;
        self
    }
}

impl SsdpSearch for ScriptedSearch {
    fn search(&self, _timeout: Duration) -> dlna_discovery::Result<Box<dyn Iterator<Item = SsdpResponse> + Send>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let spacing = self.spacing;
        Ok(Box::new(self.responses.clone().into_iter().inspect(move |_| {
            if !spacing.is_zero() {
                thread::sleep(spacing);
            }
        })))
    }
}

/// Search whose socket could not be opened
pub struct FailingSearch;

impl SsdpSearch for FailingSearch {
    fn search(&self, _timeout: Duration) -> dlna_discovery::Result<Box<dyn Iterator<Item = SsdpResponse> + Send>> {
        Err(DiscoveryError::NetworkError("Failed to bind UDP socket: address in use".to_string()))
    }
}

/// How a simulated device answers a description request
#[derive(Clone)]
pub enum Behavior {
    Describe(String),
    Unreachable,
    Hang(Duration),
}

/// Fetcher answering from a table keyed by location, counting requests
#[derive(Default)]
pub struct ScriptedFetcher {
    devices: HashMap<String, Behavior>,
    pub fetched: Arc<Mutex<Vec<String>>>,
    pub budgets: Arc<Mutex<Vec<Duration>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ip: &str, behavior: Behavior) -> Self {
        self.devices.insert(location_for(ip), behavior);
        self
    }

    pub fn with_fixture(self, ip: &str, fixture: &str) -> Self {
        self.with(ip, Behavior::Describe(load_fixture(fixture)))
    }
}

impl DescriptionFetcher for ScriptedFetcher {
    fn fetch_description(&self, location: &str) -> dlna_discovery::Result<DeviceDescription> {
        self.fetched.lock().unwrap().push(location.to_string());
        match self.devices.get(location) {
            Some(Behavior::Describe(xml)) => DeviceDescription::from_xml(xml),
            Some(Behavior::Hang(duration)) => {
                thread::sleep(*duration);
                Err(DiscoveryError::Unreachable {
                    location: location.to_string(),
                    reason: "timed out".to_string(),
                })
            }
            Some(Behavior::Unreachable) | None => Err(DiscoveryError::Unreachable {
                location: location.to_string(),
                reason: "connection refused".to_string(),
            }),
        }
    }

    fn fetch_description_within(&self, location: &str, budget: Duration) -> dlna_discovery::Result<DeviceDescription> {
        self.budgets.lock().unwrap().push(budget);
        self.fetch_description(location)
    }
}
