//! API key storage.
//!
//! The appliance authenticates every request through a `key` query
//! parameter. [`ApiKey`] keeps that secret out of logs and debug output:
//! the value is zeroized on drop and `Debug` shows `[REDACTED]`. Sessions
//! without a key use the appliance's `"unauthenticated"` sentinel value.

use std::fmt;

use zeroize::Zeroize;

use crate::error::ClientError;
use frostlink_config::AuthConfig;

/// Sentinel credential for sessions that carry no API key.
pub const UNAUTHENTICATED_KEY: &str = "unauthenticated";

/// An appliance API key with automatic zeroization.
#[derive(Clone)]
pub struct ApiKey {
    inner: String,
}

impl ApiKey {
    /// Wrap an explicit key value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// The sentinel key used when no credential was configured.
    pub fn unauthenticated() -> Self {
        Self::new(UNAUTHENTICATED_KEY)
    }

    /// Whether this is the unauthenticated sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.inner == UNAUTHENTICATED_KEY
    }

    /// Get the key value for query-parameter injection.
    ///
    /// Use sparingly — the exposed value must never reach a log sink
    /// unmasked.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Key length (without exposing the value).
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the key value is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Resolve a key from the `[auth]` config section.
    ///
    /// Sources: `inline` (value in the config file), `env` (environment
    /// variable, default `FROSTLINK_API_KEY`), `file` (first line of the
    /// referenced file), or `none` (the unauthenticated sentinel).
    pub fn from_auth_config(auth: &AuthConfig) -> Result<Self, ClientError> {
        match auth.source.as_str() {
            "none" => Ok(Self::unauthenticated()),
            "inline" => match &auth.value {
                Some(value) if !value.is_empty() => Ok(Self::new(value.clone())),
                _ => Err(ClientError::Config(
                    "auth.source = \"inline\" requires a non-empty auth.value".to_string(),
                )),
            },
            "env" => {
                let var = auth.env_var.as_deref().unwrap_or("FROSTLINK_API_KEY");
                match std::env::var(var) {
                    Ok(value) if !value.is_empty() => Ok(Self::new(value)),
                    _ => Err(ClientError::Config(format!(
                        "environment variable {var} is not set or empty"
                    ))),
                }
            }
            "file" => {
                let path = auth.file_path.as_deref().ok_or_else(|| {
                    ClientError::Config(
                        "auth.source = \"file\" requires auth.file_path".to_string(),
                    )
                })?;
                let content = std::fs::read_to_string(path).map_err(|e| {
                    ClientError::Config(format!("failed to read key file {path:?}: {e}"))
                })?;
                let value = content.trim_end_matches('\n').to_string();
                if value.is_empty() {
                    return Err(ClientError::Config(format!("key file {path:?} is empty")));
                }
                Ok(Self::new(value))
            }
            other => Err(ClientError::Config(format!(
                "unknown auth.source {other:?} (expected inline, env, file, or none)"
            ))),
        }
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("inner", &"[REDACTED]")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl Drop for ApiKey {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}
