use std::fmt;

use dlna_discovery::DiscoveryError;
use soap_client::SoapError;
use thiserror::Error;

/// Failures talking to one specific renderer.
///
/// These describe what went wrong on the wire. They are wrapped in an
/// [`ApiError`] that records which step of a control sequence failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The device could not be contacted at all
    #[error("device at {location} is unreachable: {reason}")]
    Unreachable { location: String, reason: String },

    /// The device no longer offers the service a control call needs
    #[error("device at {location} does not offer {service_type}")]
    CapabilityMissing { location: String, service_type: String },

    /// The device answered with a UPnP/SOAP fault
    #[error("device rejected the request with UPnP error {code}{}", fmt_description(description))]
    Rejected { code: u16, description: String },

    /// HTTP error status without a fault body
    #[error("device answered with HTTP status {0}")]
    Status(u16),

    /// The response could not be parsed or lacked required elements
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Connection-level failure of a control request
    #[error("network error: {0}")]
    Network(String),
}

fn fmt_description(description: &str) -> String {
    if description.is_empty() {
        String::new()
    } else {
        format!(" ({})", description)
    }
}

/// The step of `play` that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStep {
    SetUri,
    Play,
}

impl fmt::Display for PlaybackStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackStep::SetUri => write!(f, "SetAVTransportURI"),
            PlaybackStep::Play => write!(f, "Play"),
        }
    }
}

/// The control action that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Re-deriving the AVTransport control endpoint from the description
    ResolveEndpoint,
    Stop,
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlAction::ResolveEndpoint => write!(f, "resolving the control endpoint"),
            ControlAction::Stop => write!(f, "Stop"),
        }
    }
}

/// High-level errors for resolving and controlling renderers
#[derive(Debug, Error)]
pub enum ApiError {
    /// No device name was given and no default device is configured
    #[error("no device specified and no default device configured")]
    NoDeviceSpecified,

    /// One of the mandatory steps of `play` failed; later steps were not issued
    #[error("playback failed at {step}: {source}")]
    PlaybackFailed {
        step: PlaybackStep,
        #[source]
        source: TransportError,
    },

    #[error("{action} failed: {source}")]
    ControlFailed {
        action: ControlAction,
        #[source]
        source: TransportError,
    },

    /// The discovery search could not be started
    #[error("discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),
}

impl ApiError {
    /// The underlying transport failure, if this error wraps one
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            ApiError::PlaybackFailed { source, .. } | ApiError::ControlFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<SoapError> for TransportError {
    fn from(error: SoapError) -> Self {
        match error {
            SoapError::Network(msg) => TransportError::Network(msg),
            SoapError::Parse(msg) => TransportError::Malformed(msg),
            SoapError::Fault { code, description } => TransportError::Rejected {
                code,
                description: description.unwrap_or_default(),
            },
            SoapError::Status(code) => TransportError::Status(code),
        }
    }
}

impl From<DiscoveryError> for TransportError {
    fn from(error: DiscoveryError) -> Self {
        match error {
            DiscoveryError::Unreachable { location, reason } => TransportError::Unreachable { location, reason },
            DiscoveryError::ParseError(msg) => TransportError::Malformed(msg),
            DiscoveryError::NetworkError(msg) => TransportError::Network(msg),
        }
    }
}
