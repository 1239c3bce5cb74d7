//! The network seam between control logic and renderers.
//!
//! [`Transport`] is everything the control client needs from the network:
//! fetching a device description and invoking a SOAP action. Tests substitute
//! scripted implementations; [`UpnpTransport`] is the real one.

use std::time::Duration;

use dlna_discovery::{
    ControlEndpoint, DescriptionFetcher, Device, DeviceDescription, HttpDescriptionFetcher,
    AV_TRANSPORT_SERVICE_TYPE,
};
use soap_client::SoapClient;
use xmltree::Element;

use crate::error::TransportError;

/// Generic UPnP transport capability
pub trait Transport: Send + Sync {
    /// Fetch and parse the description document at `location`
    fn fetch_description(&self, location: &str) -> Result<DeviceDescription, TransportError>;

    /// Invoke `action` on `endpoint` and return the `<{action}Response>` element
    fn invoke(
        &self,
        endpoint: &ControlEndpoint,
        action: &str,
        args: &[(&str, &str)],
    ) -> Result<Element, TransportError>;
}

/// [`Transport`] over HTTP: reqwest for descriptions, `soap-client` for actions
#[derive(Debug, Clone)]
pub struct UpnpTransport {
    fetcher: HttpDescriptionFetcher,
    soap_client: SoapClient,
}

impl UpnpTransport {
    /// Transport with a 5-second description timeout and default SOAP timeouts
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Duration::from_secs(5))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        Ok(Self {
            fetcher: HttpDescriptionFetcher::new(timeout)?,
            soap_client: SoapClient::with_timeouts(timeout, timeout * 2),
        })
    }
}

impl Transport for UpnpTransport {
    fn fetch_description(&self, location: &str) -> Result<DeviceDescription, TransportError> {
        Ok(self.fetcher.fetch_description(location)?)
    }

    fn invoke(
        &self,
        endpoint: &ControlEndpoint,
        action: &str,
        args: &[(&str, &str)],
    ) -> Result<Element, TransportError> {
        Ok(self
            .soap_client
            .call(&endpoint.control_url, &endpoint.service_type, action, args)?)
    }
}

/// Re-derive the AVTransport control endpoint of `device` from its location.
///
/// Nothing is cached: every call fetches the description again, so a device
/// that dropped the service since discovery yields `CapabilityMissing`.
pub fn resolve_av_transport(
    transport: &dyn Transport,
    device: &Device,
) -> Result<ControlEndpoint, TransportError> {
    let description = transport.fetch_description(&device.location)?;
    description
        .control_endpoint(&device.location, AV_TRANSPORT_SERVICE_TYPE)?
        .ok_or_else(|| TransportError::CapabilityMissing {
            location: device.location.clone(),
            service_type: AV_TRANSPORT_SERVICE_TYPE.to_string(),
        })
}
