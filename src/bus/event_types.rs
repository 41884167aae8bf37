//! Channel names and typed payload decoding.
//!
//! Single source of truth for the channel protocol between the UI and the
//! backend process. Payloads travel as raw JSON on the bus; `ChannelEvent`
//! gives each known channel an explicit shape and collapses everything else
//! (unknown channel, undecodable payload) into `Unknown` instead of passing
//! untyped data through silently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::LogEvent;
use crate::ops::OperationId;

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// backend -> core: liveness signal for one in-flight operation.
pub const CHANNEL_HEARTBEAT: &str = "requestHeartBeat";
/// core -> backend: best-effort cancellation request.
pub const CHANNEL_OPERATION_CANCEL: &str = "operation.cancel";
/// backend -> core: debug log stream.
pub const CHANNEL_LOG_STREAM: &str = "logStream";
/// backend -> core: launch arguments, first start and second-instance launch.
pub const CHANNEL_LAUNCH_ARGS: &str = "launchArgs";
/// backend -> core: a backend store index changed.
pub const CHANNEL_STORE_EVENT: &str = "storeEvent";
/// core -> backend: the UI finished wiring its listeners.
pub const CHANNEL_READY: &str = "ready";

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchEvent {
    pub args: Vec<String>,
}

/// Mutation notice from a backend store index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMutation {
    pub id: String,
    #[serde(rename = "type")]
    pub index_type: String,
}

/// One decoded bus event.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Heartbeat(OperationId),
    CancelRequest(OperationId),
    Log(LogEvent),
    LaunchArgs(LaunchEvent),
    StoreMutation(StoreMutation),
    Ready,
    Unknown { channel: String, payload: Value },
}

impl ChannelEvent {
    /// Decode a raw bus payload. Anything that does not match the channel's
    /// declared shape comes back as `Unknown`.
    pub fn decode(channel: &str, payload: &Value) -> ChannelEvent {
        let unknown = || ChannelEvent::Unknown {
            channel: channel.to_string(),
            payload: payload.clone(),
        };
        match channel {
            CHANNEL_HEARTBEAT => payload
                .as_str()
                .and_then(|raw| raw.parse().ok())
                .map(ChannelEvent::Heartbeat)
                .unwrap_or_else(unknown),
            CHANNEL_OPERATION_CANCEL => payload
                .as_str()
                .and_then(|raw| raw.parse().ok())
                .map(ChannelEvent::CancelRequest)
                .unwrap_or_else(unknown),
            CHANNEL_LOG_STREAM => serde_json::from_value(payload.clone())
                .map(ChannelEvent::Log)
                .unwrap_or_else(|_| unknown()),
            CHANNEL_LAUNCH_ARGS => serde_json::from_value(payload.clone())
                .map(ChannelEvent::LaunchArgs)
                .unwrap_or_else(|_| unknown()),
            CHANNEL_STORE_EVENT => serde_json::from_value(payload.clone())
                .map(ChannelEvent::StoreMutation)
                .unwrap_or_else(|_| unknown()),
            CHANNEL_READY => ChannelEvent::Ready,
            _ => unknown(),
        }
    }
}
