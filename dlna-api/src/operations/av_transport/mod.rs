//! AVTransport service operations
//!
//! Operations for controlling playback on a media renderer. Every request
//! targets transport instance 0, the only instance most renderers expose.

mod get_transport_info;
mod play;
mod set_av_transport_uri;
mod stop;

pub use get_transport_info::{GetTransportInfoOperation, GetTransportInfoRequest, GetTransportInfoResponse};
pub use play::{PlayOperation, PlayRequest};
pub use set_av_transport_uri::{SetAVTransportURIOperation, SetAVTransportURIRequest};
pub use stop::{StopOperation, StopRequest};

/// Transport instance addressed by every operation
pub const DEFAULT_INSTANCE_ID: u32 = 0;
