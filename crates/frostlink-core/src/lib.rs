#![deny(unsafe_code)]

//! Frostlink core — permission-gated client for a cryogenic-system control
//! appliance's HTTPS/JSON API.
//!
//! The [`Client`] facade owns the connection identity (host, port, access
//! mode, API key) and exposes typed operations over the appliance's
//! request/response protocol. Every operation passes a client-side
//! capability gate before any bytes leave the process; the gate is
//! defense-in-depth only — authoritative enforcement lives on the appliance
//! side via API key management.
//!
//! Transport faults never escape as raw errors: they are normalized into
//! the appliance's own error-envelope shape, logged with the API key
//! masked, and surfaced to callers as typed neutral defaults.

/// Client facade: session identity, capability gating, typed operations.
pub mod client;
/// Response envelope wire types.
pub mod envelope;
/// Closed error taxonomy for client operations.
pub mod error;
/// Envelope validation and value-freshness interpretation.
pub mod interpret;
/// Access modes (capability levels).
pub mod mode;
/// Endpoint construction and API-key masking.
pub mod protocol;
/// API key storage with zeroization and redaction.
pub mod secret;
/// Blocking HTTP transport boundary.
pub mod transport;

pub use client::{Client, ConnectParams, SystemInfo};
pub use envelope::ResponseEnvelope;
pub use error::ClientError;
pub use interpret::ValueOutcome;
pub use mode::Mode;
pub use secret::ApiKey;
pub use transport::{HttpTransport, Transport, WireRequest, WireResponse};
