//! Transport control of a resolved renderer.

use std::sync::Arc;

use dlna_discovery::{ControlEndpoint, Device};
use tracing::{debug, info};

use crate::error::{ApiError, ControlAction, PlaybackStep, Result, TransportError};
use crate::operation::execute;
use crate::operations::av_transport::{
    GetTransportInfoOperation, GetTransportInfoRequest, PlayOperation, PlayRequest, SetAVTransportURIOperation,
    SetAVTransportURIRequest, StopOperation, StopRequest, DEFAULT_INSTANCE_ID,
};
use crate::status::PlaybackStatus;
use crate::transport::{resolve_av_transport, Transport};

/// Run an optional step, logging and discarding its failure
pub fn best_effort<T>(what: &str, result: std::result::Result<T, TransportError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Ignoring failed {}: {}", what, e);
            None
        }
    }
}

/// Issues AVTransport actions against renderers.
///
/// The control endpoint is re-derived from the device's location on every
/// call, so each operation costs one description fetch plus its actions.
///
/// # Examples
///
/// ```no_run
/// use dlna_api::{ControlClient, UpnpTransport};
///
/// let client = ControlClient::new(UpnpTransport::new()?);
/// for device in dlna_discovery::get() {
///     println!("{}: {}", device.name, client.get_status(&device));
/// }
/// # Ok::<(), dlna_api::TransportError>(())
/// ```
#[derive(Clone)]
pub struct ControlClient {
    transport: Arc<dyn Transport>,
}

impl ControlClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Make `device` play `url`.
    ///
    /// Stops whatever is playing (ignoring failure), sets the new source and
    /// starts playback, in that order. Returns once the device acknowledged
    /// `Play`.
    pub fn play(&self, device: &Device, url: &str) -> Result<()> {
        let endpoint = self.endpoint(device)?;

        best_effort(
            "Stop before SetAVTransportURI",
            execute::<StopOperation>(self.transport.as_ref(), &endpoint, &StopRequest {
                instance_id: DEFAULT_INSTANCE_ID,
            }),
        );

        execute::<SetAVTransportURIOperation>(
            self.transport.as_ref(),
            &endpoint,
            &SetAVTransportURIRequest::for_uri(url),
        )
        .map_err(|source| ApiError::PlaybackFailed {
            step: PlaybackStep::SetUri,
            source,
        })?;

        execute::<PlayOperation>(self.transport.as_ref(), &endpoint, &PlayRequest {
            instance_id: DEFAULT_INSTANCE_ID,
            speed: "1".to_string(),
        })
        .map_err(|source| ApiError::PlaybackFailed {
            step: PlaybackStep::Play,
            source,
        })?;

        info!("Playing {} on {}", url, device.name);
        Ok(())
    }

    pub fn stop(&self, device: &Device) -> Result<()> {
        let endpoint = self.endpoint(device)?;

        execute::<StopOperation>(self.transport.as_ref(), &endpoint, &StopRequest {
            instance_id: DEFAULT_INSTANCE_ID,
        })
        .map_err(|source| ApiError::ControlFailed {
            action: ControlAction::Stop,
            source,
        })?;

        info!("Stopped playback on {}", device.name);
        Ok(())
    }

    /// Query the current transport state. Never fails; problems are reported
    /// through [`PlaybackStatus::error`].
    pub fn get_status(&self, device: &Device) -> PlaybackStatus {
        let result = resolve_av_transport(self.transport.as_ref(), device).and_then(|endpoint| {
            execute::<GetTransportInfoOperation>(self.transport.as_ref(), &endpoint, &GetTransportInfoRequest {
                instance_id: DEFAULT_INSTANCE_ID,
            })
        });

        match result {
            Ok(info) => PlaybackStatus::from(info.current_transport_state),
            Err(e) => {
                debug!("Status query for {} failed: {}", device.name, e);
                PlaybackStatus::error(e)
            }
        }
    }

    fn endpoint(&self, device: &Device) -> Result<ControlEndpoint> {
        resolve_av_transport(self.transport.as_ref(), device).map_err(|source| ApiError::ControlFailed {
            action: ControlAction::ResolveEndpoint,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_effort_passes_success_through() {
        assert_eq!(best_effort("noop", Ok::<_, TransportError>(7)), Some(7));
    }

    #[test]
    fn test_best_effort_swallows_failure() {
        let result: std::result::Result<(), _> = Err(TransportError::Status(500));
        assert_eq!(best_effort("Stop", result), None);
    }
}
