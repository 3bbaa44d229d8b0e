//! Blocking JSON-over-HTTP transport used by the gateway.

use serde_json::Value;
use std::fmt;
use std::time::Duration;

const USER_AGENT: &str = concat!("GeoAtlas/", env!("CARGO_PKG_VERSION"));

/// Upstream failure, split so callers can react to specific statuses.
#[derive(Debug, Clone)]
pub enum FetchError {
    /// The service answered with a non-2xx status.
    Status(u16, String),
    /// No usable answer (DNS, connect, TLS, timeout).
    Transport(String),
    /// The body was not the JSON we expected.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code, body) if body.is_empty() => write!(f, "status code {}", code),
            Self::Status(code, body) => write!(f, "status code {}: {}", code, body),
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::Decode(msg) => write!(f, "invalid response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// One GET returning a JSON document.
///
/// `query` pairs are URL-encoded by the implementation; `url` must already
/// be encoded.
pub trait Fetch: Send + Sync {
    fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, FetchError>;
}

impl<T: Fetch + ?Sized> Fetch for Box<T> {
    fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        (**self).get_json(url, query)
    }
}

/// Production transport backed by a shared `ureq` agent.
pub struct UreqFetch {
    agent: ureq::Agent,
}

impl UreqFetch {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self { agent }
    }
}

impl Default for UreqFetch {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl Fetch for UreqFetch {
    fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        let mut request = self.agent.get(url);
        for (key, value) in query {
            request = request.query(key, value);
        }

        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(code, response) => {
                let body = response.into_string().unwrap_or_default();
                FetchError::Status(code, upstream_message(&body))
            }
            ureq::Error::Transport(t) => FetchError::Transport(t.to_string()),
        })?;

        response
            .into_json()
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Pull `message` out of a JSON error body, else keep the raw (short) body.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
