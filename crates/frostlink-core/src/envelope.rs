//! Wire types for the appliance's JSON response envelope.
//!
//! Every appliance call answers with one top-level envelope carrying a
//! status/code/description triple plus optional typed content. Transport
//! faults are normalized into the same shape (see
//! [`ResponseEnvelope::communication_failure`]) so the interpreter has a
//! single input format.

use serde::Deserialize;

/// Reserved error code for transport/communication failures. Any other
/// code on an ERROR envelope is a genuine appliance fault.
pub const COMMUNICATION_ERROR_CODE: i64 = -1;

/// Top-level JSON object returned by the appliance for every call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseEnvelope {
    /// "OK" or "ERROR". Missing status is treated as OK — the appliance
    /// omits it on some read endpoints.
    #[serde(default = "default_status")]
    pub status: String,

    /// Error code; `-1` is reserved for communication failures.
    #[serde(default)]
    pub code: Option<i64>,

    /// Name of the addressed value, or of the error on ERROR envelopes.
    #[serde(default)]
    pub name: Option<String>,

    /// Human-readable error description.
    #[serde(default)]
    pub description: Option<String>,

    /// Endpoint the failure refers to (communication errors only).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Value type tag; absent or null means the value has no content.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Typed value content.
    #[serde(default)]
    pub content: Option<ValueContent>,

    // System-info handshake fields.
    #[serde(default)]
    pub system_name: Option<String>,
    #[serde(default)]
    pub system_version: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
}

fn default_status() -> String {
    "OK".to_string()
}

/// Content block of a value envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ValueContent {
    #[serde(default)]
    pub latest_valid_value: Option<LatestValue>,
}

/// A single device-reported measurement at the time of the call.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestValue {
    pub value: f64,
    /// Unix timestamp of the measurement.
    #[serde(default)]
    pub date: i64,
    /// Whether the appliance considers the measurement stale.
    #[serde(default)]
    pub outdated: bool,
    /// Synchronization status; "SYNCHRONIZED" is the only trusted state.
    #[serde(default)]
    pub status: String,
}

impl ResponseEnvelope {
    /// Whether the envelope reports an error status.
    pub fn is_error(&self) -> bool {
        self.status == "ERROR"
    }

    /// Synthetic envelope for a transport-level failure, in the same shape
    /// the appliance uses for its own errors.
    ///
    /// `description` and `endpoint` must already be masked by the caller.
    pub fn communication_failure(endpoint: impl Into<String>, description: impl Into<String>) -> Self {
        ResponseEnvelope {
            status: "ERROR".to_string(),
            code: Some(COMMUNICATION_ERROR_CODE),
            description: Some(description.into()),
            endpoint: Some(endpoint.into()),
            ..ResponseEnvelope::default()
        }
    }
}
