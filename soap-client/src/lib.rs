//! Private SOAP client for UPnP device communication
//!
//! This crate provides a minimal SOAP client for invoking actions on UPnP
//! services such as a media renderer's AVTransport. It builds the SOAP
//! envelope, escapes argument values, posts to the service's control URL and
//! returns the `<ActionResponse>` element, decoding SOAP faults into
//! [`SoapError::Fault`].

mod error;

pub use error::SoapError;

use std::time::Duration;
use xmltree::Element;

/// A minimal SOAP client for UPnP device communication
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
}

impl SoapClient {
    /// Create a new SOAP client with default configuration
    pub fn new() -> Self {
        Self::with_timeouts(Duration::from_secs(5), Duration::from_secs(10))
    }

    /// Create a SOAP client with explicit connect and read timeouts
    pub fn with_timeouts(connect: Duration, read: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect)
                .timeout_read(read)
                .build(),
        }
    }

    /// Invoke `action` on the service at `control_url` and return the parsed
    /// `<{action}Response>` element.
    ///
    /// Argument values are XML-escaped; names are written as given and must be
    /// valid element names.
    pub fn call(
        &self,
        control_url: &str,
        service_type: &str,
        action: &str,
        args: &[(&str, &str)],
    ) -> Result<Element, SoapError> {
        let body = build_envelope(service_type, action, args);
        let soap_action = format!("\"{}#{}\"", service_type, action);

        tracing::debug!(control_url, action, "invoking SOAP action");

        let result = self
            .agent
            .post(control_url)
            .set("Content-Type", "text/xml; charset=\"utf-8\"")
            .set("SOAPACTION", &soap_action)
            .send_string(&body);

        let xml_text = match result {
            Ok(response) => response
                .into_string()
                .map_err(|e| SoapError::Network(e.to_string()))?,
            // UPnP devices report action errors as HTTP 500 with a fault body
            Err(ureq::Error::Status(code, response)) => {
                let text = response.into_string().unwrap_or_default();
                return Err(match Element::parse(text.as_bytes()) {
                    Ok(xml) => match self.extract_response(&xml, action) {
                        Err(fault @ SoapError::Fault { .. }) => fault,
                        _ => SoapError::Status(code),
                    },
                    Err(_) => SoapError::Status(code),
                });
            }
            Err(e) => return Err(SoapError::Network(e.to_string())),
        };

        let xml = Element::parse(xml_text.as_bytes())
            .map_err(|e| SoapError::Parse(e.to_string()))?;

        // Extract response or handle SOAP fault
        self.extract_response(&xml, action)
    }

    fn extract_response(&self, xml: &Element, action: &str) -> Result<Element, SoapError> {
        let body = xml
            .get_child("Body")
            .ok_or_else(|| SoapError::Parse("Missing SOAP Body".to_string()))?;

        // Check for SOAP fault first
        if let Some(fault) = body.get_child("Fault") {
            let upnp_error = fault
                .get_child("detail")
                .and_then(|d| d.get_child("UPnPError").or_else(|| d.get_child("UpnPError")));
            let code = upnp_error
                .and_then(|e| e.get_child("errorCode"))
                .and_then(|c| c.get_text())
                .and_then(|t| t.trim().parse::<u16>().ok())
                .unwrap_or(500);
            let description = upnp_error
                .and_then(|e| e.get_child("errorDescription"))
                .and_then(|d| d.get_text())
                .or_else(|| fault.get_child("faultstring").and_then(|f| f.get_text()))
                .map(|t| t.trim().to_string());
            return Err(SoapError::Fault { code, description });
        }

        let response_name = format!("{}Response", action);
        body.get_child(response_name.as_str())
            .cloned()
            .ok_or_else(|| SoapError::Parse(format!("Missing {} element", response_name)))
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the SOAP envelope for one action invocation
fn build_envelope(service_type: &str, action: &str, args: &[(&str, &str)]) -> String {
    let payload: String = args
        .iter()
        .map(|(name, value)| format!("<{name}>{}</{name}>", escape_xml(value)))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
    <s:Body>
        <u:{action} xmlns:u="{service_type}">{payload}</u:{action}>
    </s:Body>
</s:Envelope>"#
    )
}

/// Escape a value for use as XML element text
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
