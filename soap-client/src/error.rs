//! Error types for the SOAP client

use thiserror::Error;

/// Errors that can occur during SOAP communication
#[derive(Debug, Error)]
pub enum SoapError {
    /// The request never got an HTTP answer (connect, DNS, timeout, I/O)
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// XML parsing error, or a response missing the expected elements
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// SOAP fault returned by the device
    #[error("SOAP fault: error code {code}{}", description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    Fault {
        code: u16,
        description: Option<String>,
    },

    /// The device answered with an HTTP error status and no SOAP fault body
    #[error("HTTP status {0}")]
    Status(u16),
}
