//! Client facade — session identity, capability gating, typed operations.
//!
//! A [`Client`] is constructed once per appliance connection and performs
//! an unauthenticated system-info handshake at construction time. After
//! that it is read-only: every public operation is an independent
//! request/response cycle that (a) passes the capability gate, (b)
//! dispatches through the transport, and (c) interprets the envelope into
//! a typed value or the operation's neutral default.
//!
//! Transport and appliance failures are logged and degraded, never
//! propagated; the only errors callers see are pre-flight ones
//! ([`ClientError::InsufficientPermission`], [`ClientError::Config`]).

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::envelope::ResponseEnvelope;
use crate::error::ClientError;
use crate::interpret::{ValueOutcome, check_envelope, extract_value};
use crate::mode::Mode;
use crate::protocol::{endpoint, mask_key};
use crate::secret::ApiKey;
use crate::transport::{HttpTransport, Method, Transport, WireRequest};
use frostlink_config::AppConfig;

/// Default appliance HTTPS port.
pub const DEFAULT_PORT: u16 = 49098;

/// Default channel/heater counts of the declared device geometry.
pub const DEFAULT_GEOMETRY: u16 = 12;

/// API versions this client has been validated against. A mismatch is
/// advisory only — the client warns and proceeds.
const COMPATIBLE_API_VERSIONS: &[&str] = &["v2.2"];

/// Negotiated system identity, populated by the construction handshake.
/// Empty strings when the handshake could not reach the appliance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemInfo {
    pub system_name: String,
    pub system_version: String,
    pub api_version: String,
}

/// Construction parameters for a [`Client`].
#[derive(Debug)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub mode: Mode,
    pub key: Option<ApiKey>,
    pub num_channels: u16,
    pub num_heaters: u16,
    /// Optional transport timeout; `None` blocks until the OS gives up.
    pub timeout: Option<Duration>,
}

impl ConnectParams {
    pub fn new(host: impl Into<String>, mode: Mode) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            mode,
            key: None,
            num_channels: DEFAULT_GEOMETRY,
            num_heaters: DEFAULT_GEOMETRY,
            timeout: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_key(mut self, key: ApiKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_geometry(mut self, num_channels: u16, num_heaters: u16) -> Self {
        self.num_channels = num_channels;
        self.num_heaters = num_heaters;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolve parameters from a loaded configuration, including the
    /// credential source.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let mode: Mode = config.connection.mode.parse()?;
        let key = ApiKey::from_auth_config(&config.auth)?;
        Ok(Self {
            host: config.connection.host.clone(),
            port: config.connection.port,
            mode,
            key: Some(key),
            num_channels: config.connection.num_channels,
            num_heaters: config.connection.num_heaters,
            timeout: None,
        })
    }
}

/// Permission-gated client for one control appliance.
pub struct Client {
    host: String,
    port: u16,
    mode: Mode,
    key: ApiKey,
    num_channels: u16,
    num_heaters: u16,
    transport: Box<dyn Transport>,
    identity: SystemInfo,
}

impl Client {
    /// Connect over HTTPS.
    ///
    /// Fails only on invalid parameters (blank host) or a transport that
    /// cannot be built; an unreachable appliance leaves the negotiated
    /// identity empty without failing construction.
    pub fn connect(params: ConnectParams) -> Result<Self, ClientError> {
        let transport = HttpTransport::with_timeout(params.timeout)
            .map_err(|e| ClientError::Config(format!("cannot build transport: {e}")))?;
        Self::with_transport(params, Box::new(transport))
    }

    /// Connect through an explicit transport (tests inject a mock here).
    pub fn with_transport(
        params: ConnectParams,
        transport: Box<dyn Transport>,
    ) -> Result<Self, ClientError> {
        if params.host.trim().is_empty() {
            return Err(ClientError::Config("host must not be blank".to_string()));
        }

        let mut client = Client {
            host: params.host,
            port: params.port,
            mode: params.mode,
            key: params.key.unwrap_or_else(ApiKey::unauthenticated),
            num_channels: params.num_channels,
            num_heaters: params.num_heaters,
            transport,
            identity: SystemInfo::default(),
        };

        client.identity = client.system_info()?;

        if !COMPATIBLE_API_VERSIONS.contains(&client.identity.api_version.as_str()) {
            warn!(
                "incompatible API version: system API version {:?} is not in the list of \
                 compatible versions ({COMPATIBLE_API_VERSIONS:?}); proceeding with execution, \
                 but crashes and unexpected behavior are likely",
                client.identity.api_version
            );
        }

        Ok(client)
    }

    // ── General system functions ───────────────────────────────────────

    /// Query the appliance's system identity.
    ///
    /// Required mode: unauthenticated (every session passes the gate).
    /// Neutral default on any failure: empty strings.
    pub fn system_info(&self) -> Result<SystemInfo, ClientError> {
        self.mode.require(Mode::Unauthenticated)?;

        let envelope = match self.request(&["system"], &[], None) {
            Ok(envelope) => envelope,
            Err(err) => {
                error!("system info request failed: {err}");
                return Ok(SystemInfo::default());
            }
        };

        if let Err(err) = check_envelope(&envelope) {
            error!("{err}");
            return Ok(SystemInfo::default());
        }

        let identity = SystemInfo {
            system_name: envelope.system_name.unwrap_or_default(),
            system_version: envelope.system_version.unwrap_or_default(),
            api_version: envelope.api_version.unwrap_or_default(),
        };
        info!(
            "{} @https://{}:{} — system version {}, API version {}",
            identity.system_name,
            self.host,
            self.port,
            identity.system_version,
            identity.api_version
        );
        Ok(identity)
    }

    // ── Value access ───────────────────────────────────────────────────

    /// Read the latest valid value of an appliance value endpoint
    /// (`values/<segments…>`).
    ///
    /// Required mode: follow. A stale or unsynchronized value is logged at
    /// warn level and returned anyway; anything unreadable degrades to the
    /// neutral default `0.0` after an error-level log.
    pub fn latest_value(&self, segments: &[&str]) -> Result<f64, ClientError> {
        self.mode.require(Mode::Follow)?;

        let mut path = Vec::with_capacity(segments.len() + 1);
        path.push("values");
        path.extend_from_slice(segments);

        let envelope = match self.request(&path, &[], None) {
            Ok(envelope) => envelope,
            Err(err) => {
                error!("value request failed: {err}");
                return Ok(0.0);
            }
        };

        if let Err(err) = check_envelope(&envelope) {
            error!("{err}");
            return Ok(0.0);
        }

        debug!(
            "reading content from {}",
            envelope.name.as_deref().unwrap_or("<unnamed>")
        );
        match extract_value(&envelope) {
            ValueOutcome::Fresh(value) => Ok(value),
            ValueOutcome::Stale { value, warning } => {
                warn!("{warning}");
                Ok(value)
            }
            ValueOutcome::Failed(err) => {
                error!("failed to handle response envelope: {err}");
                Ok(0.0)
            }
        }
    }

    // ── Temperature control ────────────────────────────────────────────

    /// Upload PID control parameters.
    ///
    /// Required mode: operator. The appliance-side wire contract for this
    /// call is not yet specified; after a passing capability gate the
    /// request is not dispatched. Extension point: replace the warning
    /// with a POST once the payload shape is published.
    pub fn set_pid_parameters(&self, p: f64, i: f64, d: f64) -> Result<(), ClientError> {
        self.mode.require(Mode::Operator)?;
        debug!(p, i, d, "PID parameters accepted by the capability gate");
        warn!("PID parameter upload is not implemented; no request was sent");
        Ok(())
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn system_name(&self) -> &str {
        &self.identity.system_name
    }

    pub fn system_version(&self) -> &str {
        &self.identity.system_version
    }

    pub fn api_version(&self) -> &str {
        &self.identity.api_version
    }

    /// Declared channel count. Part of the configuration surface; not yet
    /// used by any operation.
    pub fn num_channels(&self) -> u16 {
        self.num_channels
    }

    /// Declared heater count. Part of the configuration surface; not yet
    /// used by any operation.
    pub fn num_heaters(&self) -> u16 {
        self.num_heaters
    }

    // ── Dispatch ───────────────────────────────────────────────────────

    /// Send one request and normalize the outcome into a response
    /// envelope.
    ///
    /// The session credential is injected under query key `key`,
    /// overwriting any caller-supplied value. Transport faults and non-2xx
    /// statuses come back as `Ok` with a synthetic communication-error
    /// envelope; a malformed JSON body on a delivered 2xx response is the
    /// one loud failure (`Err`), since it breaks this layer's contract.
    pub fn request(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
        payload: Option<Value>,
    ) -> Result<ResponseEnvelope, ClientError> {
        let url = endpoint(&self.host, self.port, segments);

        // Credential first: the rendered query then starts with `?key=`,
        // which is the form the masking routine recognizes.
        let mut query = vec![("key".to_string(), self.key.expose().to_string())];
        query.extend(
            params
                .iter()
                .filter(|(k, _)| *k != "key")
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );

        let method = if payload.is_some() {
            Method::Post
        } else {
            Method::Get
        };
        let request = WireRequest {
            method,
            url: url.clone(),
            query,
            body: payload,
        };

        match &request.body {
            Some(body) => debug!(
                "{} {} with payload {}",
                method.as_str(),
                mask_key(&request.display_url()),
                mask_key(&body.to_string())
            ),
            None => debug!("{} {}", method.as_str(), mask_key(&request.display_url())),
        }

        match self.transport.send(&request) {
            Ok(response) if response.is_success() => serde_json::from_value(response.body)
                .map_err(|e| {
                    ClientError::communication(
                        mask_key(&response.final_url),
                        format!("malformed response body: {e}"),
                    )
                }),
            Ok(response) => Ok(ResponseEnvelope::communication_failure(
                mask_key(&response.final_url),
                format!("HTTP status {}", response.status),
            )),
            Err(err) if err.is_communication_fault() => Ok(
                ResponseEnvelope::communication_failure(url, mask_key(&err.to_string())),
            ),
            Err(err) => Err(ClientError::communication(url, err.to_string())),
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("mode", &self.mode)
            .field("key", &self.key)
            .field("system_name", &self.identity.system_name)
            .field("api_version", &self.identity.api_version)
            .finish()
    }
}
