//! GetTransportInfo operation for AVTransport service

use xmltree::Element;

use crate::error::TransportError;
use crate::operation::RendererOperation;
use crate::status::TransportState;

/// GetTransportInfo operation
pub struct GetTransportInfoOperation;

/// Request for GetTransportInfo operation
#[derive(Debug, Clone)]
pub struct GetTransportInfoRequest {
    pub instance_id: u32,
}

/// Response for GetTransportInfo operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTransportInfoResponse {
    pub current_transport_state: TransportState,
    /// Device-reported raw state, before normalization
    pub raw_transport_state: String,
    pub current_transport_status: String,
    pub current_speed: String,
}

impl RendererOperation for GetTransportInfoOperation {
    type Request = GetTransportInfoRequest;
    type Response = GetTransportInfoResponse;

    const ACTION: &'static str = "GetTransportInfo";

    fn arguments(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("InstanceID", request.instance_id.to_string())]
    }

    fn parse_response(xml: &Element) -> Result<Self::Response, TransportError> {
        let state_element = xml
            .get_child("CurrentTransportState")
            .ok_or_else(|| TransportError::Malformed("Missing CurrentTransportState element".to_string()))?;
        // An empty element is present but unknown, not malformed
        let raw_transport_state = state_element
            .get_text()
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let current_transport_status = xml
            .get_child("CurrentTransportStatus")
            .and_then(|e| e.get_text())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "OK".to_string());

        let current_speed = xml
            .get_child("CurrentSpeed")
            .and_then(|e| e.get_text())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "1".to_string());

        Ok(GetTransportInfoResponse {
            current_transport_state: TransportState::from_upnp(&raw_transport_state),
            raw_transport_state,
            current_transport_status,
            current_speed,
        })
    }
}
