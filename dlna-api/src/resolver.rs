//! Name resolution: turning a user-supplied device name into a renderer.

use std::time::Duration;

use dlna_config::ConfigStore;
use dlna_discovery::{Device, DiscoveryEngine, DiscoveryError};
use tracing::{debug, info};

use crate::error::{ApiError, Result};

/// A source of freshly discovered renderers
pub trait DeviceSource: Send + Sync {
    fn discover(&self, timeout: Duration) -> std::result::Result<Vec<Device>, DiscoveryError>;
}

impl DeviceSource for DiscoveryEngine {
    fn discover(&self, timeout: Duration) -> std::result::Result<Vec<Device>, DiscoveryError> {
        DiscoveryEngine::discover(self, timeout)
    }
}

/// Where the persisted default device name comes from
pub trait DefaultDeviceStore: Send + Sync {
    fn default_device(&self) -> Option<String>;
}

impl DefaultDeviceStore for ConfigStore {
    fn default_device(&self) -> Option<String> {
        self.load_default_device()
    }
}

/// Select a device by name from `devices`.
///
/// An exact case-insensitive match wins over a substring match regardless of
/// order. Within a tier the first device in iteration order wins. A blank
/// name matches nothing.
pub fn select_device<'a>(name: &str, devices: &'a [Device]) -> Option<&'a Device> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    devices
        .iter()
        .find(|d| d.name.to_lowercase() == wanted)
        .or_else(|| devices.iter().find(|d| d.name.to_lowercase().contains(&wanted)))
}

/// Resolves an optional name hint, or the configured default, to one device.
pub struct DeviceResolver {
    source: Box<dyn DeviceSource>,
    defaults: Box<dyn DefaultDeviceStore>,
}

impl DeviceResolver {
    pub fn new(source: impl DeviceSource + 'static, defaults: impl DefaultDeviceStore + 'static) -> Self {
        Self {
            source: Box::new(source),
            defaults: Box::new(defaults),
        }
    }

    /// Resolve `name` (or the default device when `name` is absent or blank).
    ///
    /// Returns `Ok(None)` when discovery finds no matching device.
    ///
    /// # Errors
    ///
    /// `NoDeviceSpecified` when there is neither a name nor a default; no
    /// discovery is performed in that case. `Discovery` when the search could
    /// not be started.
    pub fn resolve(&self, name: Option<&str>, timeout: Duration) -> Result<Option<Device>> {
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => self.defaults.default_device().ok_or(ApiError::NoDeviceSpecified)?,
        };

        debug!(name = %name, "resolving device");
        let devices = self.source.discover(timeout)?;

        match select_device(&name, &devices) {
            Some(device) => {
                info!("Resolved '{}' to {} at {}", name, device.name, device.location);
                Ok(Some(device.clone()))
            }
            None => {
                info!("No device matching '{}' among {} discovered", name, devices.len());
                Ok(None)
            }
        }
    }
}
