//! Control and name resolution for DLNA media renderers
//!
//! This crate drives renderers found by `dlna-discovery`: it resolves a
//! user-supplied name to a device, then plays, stops or queries it through
//! the AVTransport service. It uses the private `soap-client` crate for SOAP
//! communication.
//!
//! ```no_run
//! use std::time::Duration;
//! use dlna_api::{ControlClient, DeviceResolver, UpnpTransport};
//! use dlna_config::ConfigStore;
//! use dlna_discovery::DiscoveryEngine;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = DeviceResolver::new(DiscoveryEngine::new()?, ConfigStore::new()?);
//! if let Some(device) = resolver.resolve(Some("living room"), Duration::from_secs(5))? {
//!     let client = ControlClient::new(UpnpTransport::new()?);
//!     client.play(&device, "http://192.168.1.50:8000/song.mp3")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod control;
pub mod error;
pub mod operation;
pub mod operations;
pub mod resolver;
pub mod status;
pub mod transport;

pub use control::{best_effort, ControlClient};
pub use error::{ApiError, ControlAction, PlaybackStep, Result, TransportError};
pub use operation::RendererOperation;
pub use resolver::{select_device, DefaultDeviceStore, DeviceResolver, DeviceSource};
pub use status::{PlaybackStatus, TransportState};
pub use transport::{Transport, UpnpTransport};
