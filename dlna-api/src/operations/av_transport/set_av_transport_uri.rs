//! SetAVTransportURI operation for AVTransport service

use xmltree::Element;

use crate::error::TransportError;
use crate::operation::RendererOperation;

/// SetAVTransportURI operation
pub struct SetAVTransportURIOperation;

/// Request for SetAVTransportURI operation
#[derive(Debug, Clone)]
pub struct SetAVTransportURIRequest {
    pub instance_id: u32,
    /// Media URL the renderer should fetch
    pub current_uri: String,
    /// DIDL-Lite metadata; empty is accepted by most renderers
    pub current_uri_metadata: String,
}

impl SetAVTransportURIRequest {
    /// Request for `uri` without metadata on instance 0
    pub fn for_uri(uri: &str) -> Self {
        Self {
            instance_id: super::DEFAULT_INSTANCE_ID,
            current_uri: uri.to_string(),
            current_uri_metadata: String::new(),
        }
    }
}

impl RendererOperation for SetAVTransportURIOperation {
    type Request = SetAVTransportURIRequest;
    type Response = ();

    const ACTION: &'static str = "SetAVTransportURI";

    fn arguments(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![
            ("InstanceID", request.instance_id.to_string()),
            ("CurrentURI", request.current_uri.clone()),
            ("CurrentURIMetaData", request.current_uri_metadata.clone()),
        ]
    }

    fn parse_response(_xml: &Element) -> Result<Self::Response, TransportError> {
        Ok(())
    }
}
