//! DLNA media renderer discovery library
//!
//! This crate finds UPnP/DLNA media renderers on the local network using SSDP
//! (Simple Service Discovery Protocol) and UPnP device descriptions. Only
//! devices that offer the AVTransport service are reported.
//!
//! # Quick Start
//!
//! ```no_run
//! use dlna_discovery::get;
//!
//! // Discover all renderers on the network
//! for device in get() {
//!     println!("Found {} ({}) at {}", device.name, device.model_name, device.location);
//! }
//! ```
//!
//! # Custom transports
//!
//! [`DiscoveryEngine::with_parts`] accepts any [`SsdpSearch`] and
//! [`DescriptionFetcher`], which is how the tests simulate networks.

mod error;
mod ssdp;
pub mod device;
mod discovery;
mod fetch;

pub use device::{ControlEndpoint, DeviceDescription, ServiceDescription};
pub use discovery::DiscoveryEngine;
pub use error::{DiscoveryError, Result};
pub use fetch::{DescriptionFetcher, HttpDescriptionFetcher};
pub use ssdp::{SsdpClient, SsdpResponse, SsdpSearch, SEARCH_ALL, SSDP_MULTICAST_ADDR};

use serde::Serialize;
use std::time::Duration;

/// Name reported for devices that do not advertise a friendly name
pub const UNKNOWN_DEVICE_NAME: &str = "Unknown DLNA Device";

/// Model reported for devices that do not advertise a model name
pub const UNKNOWN_MODEL_NAME: &str = "Unknown";

/// Substring of the advertised type that marks a media renderer
pub const MEDIA_RENDERER_MARKER: &str = "MediaRenderer";

/// Service a renderer must offer to be controllable
pub const AV_TRANSPORT_SERVICE_TYPE: &str = "urn:schemas-upnp-org:service:AVTransport:1";

/// Scan duration used by [`get`]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A discovered media renderer.
///
/// Only constructed for devices that offered AVTransport when they were
/// described. `location` is the description URL and is the address every
/// later control call starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    /// Friendly name, or [`UNKNOWN_DEVICE_NAME`]
    pub name: String,
    /// Model name, or [`UNKNOWN_MODEL_NAME`]
    pub model_name: String,
    /// Device description URL
    pub location: String,
    /// Unique device name, e.g. "uuid:5f9ec1b3-ed59-1900-4530-00a0deadbeef"; may be empty
    pub udn: String,
}

/// Discover all renderers on the local network with the default 5-second timeout.
///
/// # Examples
///
/// ```no_run
/// let devices = dlna_discovery::get();
/// println!("{} renderer(s)", devices.len());
/// ```
pub fn get() -> Vec<Device> {
    get_with_timeout(DEFAULT_TIMEOUT)
}

/// Discover all renderers on the local network with a custom timeout.
///
/// Returns an empty list (after logging the cause) when the search cannot be
/// started, e.g. because no UDP socket could be bound. Use
/// [`DiscoveryEngine::discover`] to observe that error.
pub fn get_with_timeout(timeout: Duration) -> Vec<Device> {
    let result = DiscoveryEngine::new().and_then(|engine| engine.discover(timeout));
    result.unwrap_or_else(|e| {
        tracing::error!("Discovery failed: {}", e);
        Vec::new()
    })
}
