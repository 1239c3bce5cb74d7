use xmltree::Element;

use dlna_discovery::ControlEndpoint;

use crate::error::TransportError;
use crate::transport::Transport;

/// Base trait for all renderer UPnP operations
///
/// Each operation names its SOAP action, turns a typed request into the
/// ordered argument list and parses the action's response element.
pub trait RendererOperation {
    /// The request type for this operation
    type Request;

    /// The response type for this operation
    type Response;

    /// The SOAP action name for this operation
    const ACTION: &'static str;

    /// Arguments of the action in the order the service declares them
    fn arguments(request: &Self::Request) -> Vec<(&'static str, String)>;

    /// Parse the `<{ACTION}Response>` element into the typed response
    fn parse_response(xml: &Element) -> Result<Self::Response, TransportError>;
}

/// Execute `Op` against the control endpoint of a renderer
pub fn execute<Op: RendererOperation>(
    transport: &dyn Transport,
    endpoint: &ControlEndpoint,
    request: &Op::Request,
) -> Result<Op::Response, TransportError> {
    let arguments = Op::arguments(request);
    let args: Vec<(&str, &str)> = arguments
        .iter()
        .map(|(name, value)| (*name, value.as_str()))
        .collect();

    tracing::debug!(action = Op::ACTION, control_url = %endpoint.control_url, "executing operation");
    let xml = transport.invoke(endpoint, Op::ACTION, &args)?;
    Op::parse_response(&xml)
}
