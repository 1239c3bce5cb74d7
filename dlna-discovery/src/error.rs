//! Error types for the discovery system.

use std::fmt;

/// Error type for discovery operations.
///
/// Represents the failure modes of the search itself and of individual
/// candidates. Candidate failures never abort a discovery call; they are
/// logged and the candidate is excluded.
#[derive(Debug)]
pub enum DiscoveryError {
    /// Network-related errors (socket creation, sending the search, etc.)
    NetworkError(String),
    /// Parsing errors (device description XML, malformed URLs)
    ParseError(String),
    /// A specific device could not be contacted
    Unreachable { location: String, reason: String },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DiscoveryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DiscoveryError::Unreachable { location, reason } => {
                write!(f, "Device at {} is unreachable: {}", location, reason)
            }
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
