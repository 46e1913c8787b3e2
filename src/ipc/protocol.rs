//! IPC message protocol definitions
//!
//! All messages are JSON-encoded, prefixed with a 4-byte little-endian length.

use serde::{Deserialize, Serialize};

use crate::counter::PostureState;
use crate::events::RepEvent;
use crate::pose::Frame;

/// Requests from pose sources and UI clients to the daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Request a counter status snapshot
    GetStatus,

    /// Deliver one frame of landmarks
    SubmitFrame { frame: Frame },

    /// Clear the counter
    Reset,

    /// Begin a recording session (resets the counter)
    StartSession,

    /// Stop accepting frames until the next session starts
    StopSession,

    /// Ping to check connectivity
    Ping,

    /// Turn this connection into a push-only event stream
    Subscribe,
}

/// Responses from daemon to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Current counter status
    Status(CounterStatus),

    /// Frame was queued for the state machine
    FrameAccepted,

    /// Frame was discarded because no session is recording
    FrameDropped,

    /// Reset was queued for the state machine
    ResetRequested,

    /// Recording state after a session request
    Session { recording: bool },

    /// Pong response to ping
    Pong,

    /// Subscription confirmed; only notifications follow
    Subscribed,

    /// Pushed to subscribed clients
    Notification { event: RepEvent },

    /// Error response
    Error { code: String, message: String },
}

impl Response {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Response::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Counter status snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterStatus {
    /// Daemon version
    pub version: String,

    /// Repetitions counted in the current session
    pub count: u32,

    /// Last known posture
    pub posture: PostureState,

    /// Whether submitted frames are forwarded to the counter
    pub recording: bool,

    /// Frames submitted since startup
    pub frames_received: u64,

    /// Frames discarded while not recording
    pub frames_dropped: u64,

    /// Uptime in seconds
    pub uptime_secs: u64,
}

impl Default for CounterStatus {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            count: 0,
            posture: PostureState::Neutral,
            recording: true,
            frames_received: 0,
            frames_dropped: 0,
            uptime_secs: 0,
        }
    }
}
