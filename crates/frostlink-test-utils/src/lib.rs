#![deny(unsafe_code)]

//! Shared test utilities for the FrostLink workspace.
//!
//! Provides reusable fixtures, config builders, a scripted transport, and
//! tracing helpers so that individual crate tests stay concise and
//! consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! frostlink-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod tracing_setup;
pub mod transport;
