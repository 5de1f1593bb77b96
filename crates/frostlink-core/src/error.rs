//! Closed error taxonomy for client operations.
//!
//! Messages are built from structured fields, never from raw request
//! strings: anything that could embed the API key goes through
//! [`crate::protocol::mask_key`] at construction time.

use crate::protocol::mask_key;

/// Failure kinds raised by the capability gate, the transport, the
/// appliance, or the value interpreter.
///
/// Only [`ClientError::InsufficientPermission`] and [`ClientError::Config`]
/// ever propagate out of the [`crate::Client`] facade; the remaining kinds
/// are recovered internally (logged, result degraded to the operation's
/// neutral default). [`ClientError::ValueStatus`] is the one recoverable
/// warning: the value it refers to is still returned to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error(
        "operation requires permission level {required}, but was called from permission level {actual}"
    )]
    InsufficientPermission { required: u8, actual: u8 },

    #[error("faulty communication with endpoint {endpoint}: {description}")]
    Communication { endpoint: String, description: String },

    #[error("{name} (CODE {code}): {description}")]
    Device {
        name: String,
        code: i64,
        description: String,
    },

    #[error("failed to access {value_name}: this value has no content")]
    EmptyValue { value_name: String },

    #[error(
        "value {value_name} is {} and {status}; timestamp: {}",
        staleness(.outdated),
        render_timestamp(.date)
    )]
    ValueStatus {
        value_name: String,
        date: i64,
        outdated: bool,
        status: String,
    },

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Build a communication error, masking any API key embedded in the
    /// endpoint or description.
    pub fn communication(endpoint: impl Into<String>, description: impl Into<String>) -> Self {
        ClientError::Communication {
            endpoint: mask_key(&endpoint.into()),
            description: mask_key(&description.into()),
        }
    }
}

fn staleness(outdated: &bool) -> &'static str {
    if *outdated { "outdated" } else { "not outdated" }
}

fn render_timestamp(date: &i64) -> String {
    match chrono::DateTime::from_timestamp(*date, 0) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{date} (out of range)"),
    }
}
