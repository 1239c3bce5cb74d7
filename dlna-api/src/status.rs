//! Playback state as reported to users.

use std::fmt;

/// Normalized AVTransport `CurrentTransportState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportState {
    Playing,
    Stopped,
    Paused,
    Transitioning,
    NoMediaPresent,
    Unknown,
}

impl TransportState {
    /// Normalize a device-reported state string.
    ///
    /// Both paused variants collapse to `Paused`; anything unrecognized,
    /// including an empty value, is `Unknown`.
    pub fn from_upnp(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "PLAYING" => TransportState::Playing,
            "STOPPED" => TransportState::Stopped,
            "PAUSED_PLAYBACK" | "PAUSED_RECORDING" => TransportState::Paused,
            "TRANSITIONING" => TransportState::Transitioning,
            "NO_MEDIA_PRESENT" => TransportState::NoMediaPresent,
            _ => TransportState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportState::Playing => "PLAYING",
            TransportState::Stopped => "STOPPED",
            TransportState::Paused => "PAUSED",
            TransportState::Transitioning => "TRANSITIONING",
            TransportState::NoMediaPresent => "NO_MEDIA_PRESENT",
            TransportState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a status query.
///
/// `state` is one of the [`TransportState`] names, or `"ERROR: <detail>"`
/// when the query itself failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackStatus {
    pub state: String,
}

impl PlaybackStatus {
    pub const ERROR_PREFIX: &'static str = "ERROR: ";

    pub fn error(detail: impl fmt::Display) -> Self {
        Self {
            state: format!("{}{}", Self::ERROR_PREFIX, detail),
        }
    }

    pub fn is_error(&self) -> bool {
        self.state.starts_with(Self::ERROR_PREFIX)
    }
}

impl From<TransportState> for PlaybackStatus {
    fn from(state: TransportState) -> Self {
        Self {
            state: state.as_str().to_string(),
        }
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.state)
    }
}
