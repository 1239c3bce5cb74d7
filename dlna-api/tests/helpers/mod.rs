//! Scripted transports and device sources for control tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dlna_api::{DefaultDeviceStore, DeviceSource, Transport, TransportError};
use dlna_discovery::{ControlEndpoint, Device, DeviceDescription, DiscoveryError};
use xmltree::Element;

pub const LOCATION: &str = "http://192.168.1.20:49152/description.xml";

pub fn load_fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

pub fn renderer() -> Device {
    Device {
        name: "Living Room TV".to_string(),
        model_name: "Acme Vision 55".to_string(),
        location: LOCATION.to_string(),
        udn: "uuid:5f9ec1b3-ed59-1900-4530-00a0deadbeef".to_string(),
    }
}

pub fn device(name: &str) -> Device {
    Device {
        name: name.to_string(),
        model_name: "Model".to_string(),
        location: format!("http://{}.local:49152/description.xml", name.to_lowercase().replace(' ', "-")),
        udn: format!("uuid:{}", name.to_lowercase().replace(' ', "-")),
    }
}

/// One recorded `invoke` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub control_url: String,
    pub action: String,
    pub args: Vec<(String, String)>,
}

/// Transport answering from scripted outcomes and recording every call
pub struct ScriptedTransport {
    description: Result<String, TransportError>,
    failures: HashMap<String, TransportError>,
    responses: HashMap<String, String>,
    pub invocations: Arc<Mutex<Vec<Invocation>>>,
    pub descriptions_fetched: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    /// A healthy renderer described by the `renderer.xml` fixture
    pub fn new() -> Self {
        Self {
            description: Ok(load_fixture("renderer.xml")),
            failures: HashMap::new(),
            responses: HashMap::new(),
            invocations: Arc::new(Mutex::new(Vec::new())),
            descriptions_fetched: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn describing(mut self, xml: &str) -> Self {
        self.description = Ok(xml.to_string());
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.description = Err(TransportError::Unreachable {
            location: LOCATION.to_string(),
            reason: "connection refused".to_string(),
        });
        self
    }

    pub fn failing(mut self, action: &str, error: TransportError) -> Self {
        self.failures.insert(action.to_string(), error);
        self
    }

    pub fn responding(mut self, action: &str, body: &str) -> Self {
        self.responses.insert(action.to_string(), body.to_string());
        self
    }

    pub fn actions(&self) -> Vec<String> {
        self.invocations.lock().unwrap().iter().map(|i| i.action.clone()).collect()
    }
}

impl Transport for ScriptedTransport {
    fn fetch_description(&self, _location: &str) -> Result<DeviceDescription, TransportError> {
        self.descriptions_fetched.fetch_add(1, Ordering::SeqCst);
        let xml = self.description.clone()?;
        Ok(DeviceDescription::from_xml(&xml)?)
    }

    fn invoke(
        &self,
        endpoint: &ControlEndpoint,
        action: &str,
        args: &[(&str, &str)],
    ) -> Result<Element, TransportError> {
        self.invocations.lock().unwrap().push(Invocation {
            control_url: endpoint.control_url.clone(),
            action: action.to_string(),
            args: args.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        });

        if let Some(error) = self.failures.get(action) {
            return Err(error.clone());
        }

        let body = self
            .responses
            .get(action)
            .cloned()
            .unwrap_or_else(|| format!("<{0}Response></{0}Response>", action));
        Element::parse(body.as_bytes()).map_err(|e| TransportError::Malformed(e.to_string()))
    }
}

/// Shares a [`ScriptedTransport`] between the client under test and the test body
#[derive(Clone)]
pub struct Shared(pub Arc<ScriptedTransport>);

impl Transport for Shared {
    fn fetch_description(&self, location: &str) -> Result<DeviceDescription, TransportError> {
        self.0.fetch_description(location)
    }

    fn invoke(
        &self,
        endpoint: &ControlEndpoint,
        action: &str,
        args: &[(&str, &str)],
    ) -> Result<Element, TransportError> {
        self.0.invoke(endpoint, action, args)
    }
}

/// Device source returning a fixed list and counting discoveries
pub struct StaticSource {
    devices: Result<Vec<Device>, String>,
    pub calls: Arc<AtomicUsize>,
    pub last_timeout: Arc<Mutex<Option<Duration>>>,
}

impl StaticSource {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices: Ok(devices),
            calls: Arc::new(AtomicUsize::new(0)),
            last_timeout: Arc::new(Mutex::new(None)),
        }
    }

    pub fn named(names: &[&str]) -> Self {
        Self::new(names.iter().map(|n| device(n)).collect())
    }

    pub fn broken() -> Self {
        Self {
            devices: Err("Failed to bind UDP socket".to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
            last_timeout: Arc::new(Mutex::new(None)),
        }
    }
}

impl DeviceSource for StaticSource {
    fn discover(&self, timeout: Duration) -> Result<Vec<Device>, DiscoveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_timeout.lock().unwrap() = Some(timeout);
        self.devices.clone().map_err(DiscoveryError::NetworkError)
    }
}

/// In-memory default device
pub struct FixedDefault(pub Option<String>);

impl FixedDefault {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn named(name: &str) -> Self {
        Self(Some(name.to_string()))
    }
}

impl DefaultDeviceStore for FixedDefault {
    fn default_device(&self) -> Option<String> {
        self.0.clone()
    }
}
