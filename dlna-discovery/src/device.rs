//! Device description parsing and capability lookup.
//!
//! This module handles parsing UPnP device description XML, locating a
//! service on the root device or any embedded device, and resolving a
//! service's control URL into an absolute endpoint.

use serde::Deserialize;
use url::Url;

use crate::error::{DiscoveryError, Result};
use crate::{Device, UNKNOWN_DEVICE_NAME, UNKNOWN_MODEL_NAME};

/// UPnP device description document (the `<root>` element).
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceDescription {
    /// Base for relative URLs; the description location is used when absent
    #[serde(rename = "URLBase", default)]
    pub url_base: Option<String>,
    pub device: DeviceInfo,
}

/// A `<device>` element, possibly containing embedded devices.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(default)]
    pub device_type: String,
    pub friendly_name: Option<String>,
    pub manufacturer: Option<String>,
    pub model_name: Option<String>,
    #[serde(rename = "UDN")]
    pub udn: Option<String>,
    pub service_list: Option<ServiceList>,
    pub device_list: Option<DeviceList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceList {
    #[serde(rename = "service", default)]
    pub services: Vec<ServiceDescription>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceList {
    #[serde(rename = "device", default)]
    pub devices: Vec<DeviceInfo>,
}

/// A `<service>` entry of a device's service list.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDescription {
    #[serde(rename = "serviceType")]
    pub service_type: String,
    #[serde(rename = "serviceId")]
    pub service_id: Option<String>,
    #[serde(rename = "controlURL")]
    pub control_url: String,
    #[serde(rename = "eventSubURL")]
    pub event_sub_url: Option<String>,
    #[serde(rename = "SCPDURL")]
    pub scpd_url: Option<String>,
}

/// Absolute address of a service's control URL together with its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEndpoint {
    pub control_url: String,
    pub service_type: String,
}

impl DeviceDescription {
    /// Parse device description from XML.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::ParseError` if the XML is malformed or has no
    /// `<device>` element.
    pub fn from_xml(xml: &str) -> Result<Self> {
        quick_xml::de::from_str(xml)
            .map_err(|e| DiscoveryError::ParseError(format!("Failed to parse device XML: {}", e)))
    }

    /// Find a service by type on the root device or any embedded device.
    ///
    /// Types are compared without their trailing version number, so a device
    /// offering `AVTransport:2` satisfies a lookup for `AVTransport:1`.
    pub fn find_service(&self, service_type: &str) -> Option<&ServiceDescription> {
        self.device.find_service(service_type)
    }

    pub fn has_service(&self, service_type: &str) -> bool {
        self.find_service(service_type).is_some()
    }

    /// Resolve the control endpoint of `service_type`.
    ///
    /// Returns `Ok(None)` when the device does not offer the service. Relative
    /// control URLs are joined onto `URLBase`, or onto `location` when the
    /// document has no base.
    pub fn control_endpoint(&self, location: &str, service_type: &str) -> Result<Option<ControlEndpoint>> {
        let Some(service) = self.find_service(service_type) else {
            return Ok(None);
        };

        let base = self
            .url_base
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(location);
        let base = Url::parse(base)
            .map_err(|e| DiscoveryError::ParseError(format!("Invalid base URL '{}': {}", base, e)))?;
        let control_url = base.join(service.control_url.trim()).map_err(|e| {
            DiscoveryError::ParseError(format!("Invalid control URL '{}': {}", service.control_url, e))
        })?;

        Ok(Some(ControlEndpoint {
            control_url: control_url.into(),
            service_type: service.service_type.clone(),
        }))
    }

    /// Convert the description to the public Device type.
    pub fn to_device(&self, location: &str) -> Device {
        Device {
            name: non_empty(&self.device.friendly_name).unwrap_or_else(|| UNKNOWN_DEVICE_NAME.to_string()),
            model_name: non_empty(&self.device.model_name).unwrap_or_else(|| UNKNOWN_MODEL_NAME.to_string()),
            location: location.to_string(),
            udn: non_empty(&self.device.udn).unwrap_or_default(),
        }
    }
}

impl DeviceInfo {
    fn find_service(&self, service_type: &str) -> Option<&ServiceDescription> {
        let own = self
            .service_list
            .iter()
            .flat_map(|list| list.services.iter())
            .find(|s| same_service_type(&s.service_type, service_type));

        own.or_else(|| {
            self.device_list
                .iter()
                .flat_map(|list| list.devices.iter())
                .find_map(|d| d.find_service(service_type))
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Compare two URNs ignoring the version suffix
fn same_service_type(advertised: &str, wanted: &str) -> bool {
    fn unversioned(urn: &str) -> &str {
        let urn = urn.trim();
        match urn.rsplit_once(':') {
            Some((head, version)) if version.chars().all(|c| c.is_ascii_digit()) => head,
            _ => urn,
        }
    }
    unversioned(advertised) == unversioned(wanted)
}
