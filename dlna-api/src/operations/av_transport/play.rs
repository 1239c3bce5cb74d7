//! Play operation for AVTransport service

use xmltree::Element;

use crate::error::TransportError;
use crate::operation::RendererOperation;

/// Play operation
pub struct PlayOperation;

/// Request for play operation
#[derive(Debug, Clone)]
pub struct PlayRequest {
    pub instance_id: u32,
    /// Playback speed; "1" is normal speed
    pub speed: String,
}

impl RendererOperation for PlayOperation {
    type Request = PlayRequest;
    type Response = ();

    const ACTION: &'static str = "Play";

    fn arguments(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![
            ("InstanceID", request.instance_id.to_string()),
            ("Speed", request.speed.clone()),
        ]
    }

    fn parse_response(_xml: &Element) -> Result<Self::Response, TransportError> {
        // Play has no out arguments
        Ok(())
    }
}
