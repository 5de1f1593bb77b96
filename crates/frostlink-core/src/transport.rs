//! Blocking HTTP transport boundary.
//!
//! The rest of the crate talks to the network through the [`Transport`]
//! trait: one synchronous round trip per call, no retries, no background
//! tasks. [`HttpTransport`] is the production implementation over
//! `reqwest`'s blocking client; tests substitute a scripted mock at the
//! same seam.

use std::time::Duration;

use serde_json::Value;

/// HTTP method of a wire request. Reads are GET, mutations are POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A fully-prepared request: endpoint URL, query parameters (credential
/// included), and an optional JSON payload. Payload present iff the call
/// is a mutating operation.
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl WireRequest {
    /// Render the URL including the query string, for logging. The result
    /// still contains the raw credential — mask before it reaches a sink.
    pub fn display_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{}?{}", self.url, query.join("&"))
    }
}

/// A delivered HTTP response. `body` is JSON for 2xx responses and `Null`
/// otherwise.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub final_url: String,
    pub body: Value,
}

impl WireResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure signals, classified so the protocol layer can
/// normalize connection-refused/timeout/bad-URL faults uniformly while
/// keeping malformed bodies loud.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("malformed JSON body from {url}: {detail}")]
    MalformedBody { url: String, detail: String },

    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether this fault should be normalized into a synthetic
    /// communication-error envelope. Malformed bodies are excluded — they
    /// indicate a contract defect and propagate loudly.
    pub fn is_communication_fault(&self) -> bool {
        !matches!(self, TransportError::MalformedBody { .. })
    }
}

/// Black-box synchronous request/response primitive.
pub trait Transport {
    fn send(&self, request: &WireRequest) -> Result<WireResponse, TransportError>;
}

/// Production transport over `reqwest::blocking`.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a transport with no request timeout: calls block until the
    /// peer answers or the OS gives up.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(None)
    }

    /// Build a transport with an optional per-request timeout; expiry
    /// surfaces as [`TransportError::Timeout`].
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        } else {
            // reqwest's blocking client defaults to 30s; the appliance
            // protocol has no timeout unless one is configured.
            builder = builder.timeout(None::<Duration>);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn classify(error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(error.to_string())
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else if error.is_builder() {
            TransportError::InvalidUrl(error.to_string())
        } else {
            TransportError::Other(error.to_string())
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &WireRequest) -> Result<WireResponse, TransportError> {
        let pairs: Vec<(&str, &str)> = request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let url = reqwest::Url::parse_with_params(&request.url, &pairs)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", request.url)))?;

        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => {
                let mut builder = self.client.post(url);
                if let Some(body) = &request.body {
                    builder = builder.json(body);
                }
                builder
            }
        };

        let response = builder.send().map_err(Self::classify)?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        let body = if response.status().is_success() {
            response
                .json::<Value>()
                .map_err(|e| TransportError::MalformedBody {
                    url: final_url.clone(),
                    detail: e.to_string(),
                })?
        } else {
            Value::Null
        };

        Ok(WireResponse {
            status,
            final_url,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_url_without_query() {
        let request = WireRequest {
            method: Method::Get,
            url: "https://h:1/system".into(),
            query: vec![],
            body: None,
        };
        assert_eq!(request.display_url(), "https://h:1/system");
    }

    #[test]
    fn test_display_url_with_query() {
        let request = WireRequest {
            method: Method::Get,
            url: "https://h:1/values/a".into(),
            query: vec![
                ("prettyprint".into(), "1".into()),
                ("key".into(), "s3cret".into()),
            ],
            body: None,
        };
        assert_eq!(
            request.display_url(),
            "https://h:1/values/a?prettyprint=1&key=s3cret"
        );
    }

    #[test]
    fn test_invalid_url_is_classified() {
        let transport = HttpTransport::new().unwrap();
        let request = WireRequest {
            method: Method::Get,
            url: "cryo:49098/system".into(), // missing scheme
            query: vec![],
            body: None,
        };
        let err = transport.send(&request).unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)), "{err:?}");
    }

    #[test]
    fn test_connection_refused_is_classified() {
        let transport = HttpTransport::new().unwrap();
        let request = WireRequest {
            method: Method::Get,
            // Discard port on loopback: nothing listens there in CI.
            url: "https://127.0.0.1:9/system".into(),
            query: vec![],
            body: None,
        };
        let err = transport.send(&request).unwrap_err();
        assert!(err.is_communication_fault(), "{err:?}");
    }

    #[test]
    fn test_malformed_body_is_not_a_communication_fault() {
        let err = TransportError::MalformedBody {
            url: "https://h:1/system".into(),
            detail: "expected value at line 1".into(),
        };
        assert!(!err.is_communication_fault());
    }

    #[test]
    fn test_method_names() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
    }
}
