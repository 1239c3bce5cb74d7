//! Stop operation for AVTransport service

use xmltree::Element;

use crate::error::TransportError;
use crate::operation::RendererOperation;

/// Stop operation
pub struct StopOperation;

/// Request for stop operation
#[derive(Debug, Clone)]
pub struct StopRequest {
    pub instance_id: u32,
}

impl RendererOperation for StopOperation {
    type Request = StopRequest;
    type Response = ();

    const ACTION: &'static str = "Stop";

    fn arguments(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("InstanceID", request.instance_id.to_string())]
    }

    fn parse_response(_xml: &Element) -> Result<Self::Response, TransportError> {
        Ok(())
    }
}
