//! Blocking HTTP seam between the API client and the network.

use std::io::Read;
use std::time::Duration;

use serde::Deserialize;

use crate::upstream::UpstreamError;

const USER_AGENT: &str = concat!("voa-episodes/", env!("CARGO_PKG_VERSION"));
/// Upper bound on binary bodies read by `get_bytes`.
const MAX_BODY_BYTES: u64 = 8 * 1024 * 1024;

/// Minimal GET-only transport. Implementations must not retry.
pub trait Transport: Send + Sync {
    /// GETs `url` with the given query parameters and returns the body text of
    /// a 2xx response.
    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, UpstreamError>;

    /// GETs `url` and returns the raw body of a 2xx response.
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, UpstreamError>;
}

/// Production transport backed by a shared `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(15))
            .timeout_write(Duration::from_secs(15))
            .user_agent(USER_AGENT)
            .build();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, UpstreamError> {
        let mut request = self.agent.get(url);
        for (key, value) in query {
            request = request.query(key, value);
        }
        let response = request.call().map_err(map_ureq_error)?;
        response
            .into_string()
            .map_err(|err| UpstreamError::Transport(format!("reading body of {url}: {err}")))
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, UpstreamError> {
        let response = self.agent.get(url).call().map_err(map_ureq_error)?;
        read_limited(response.into_reader(), MAX_BODY_BYTES, url)
    }
}

/// Reads at most `limit` bytes. A longer body is an error, never truncated.
fn read_limited(reader: impl Read, limit: u64, url: &str) -> Result<Vec<u8>, UpstreamError> {
    let mut bytes = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(|err| UpstreamError::Transport(format!("reading body of {url}: {err}")))?;
    if bytes.len() as u64 > limit {
        return Err(UpstreamError::Transport(format!(
            "body of {url} exceeds limit of {limit} bytes"
        )));
    }
    Ok(bytes)
}

fn map_ureq_error(err: ureq::Error) -> UpstreamError {
    match err {
        ureq::Error::Status(status, response) => {
            let reason = response.status_text().to_owned();
            let body = response.into_string().unwrap_or_default();
            let message = google_error_message(&body).unwrap_or(reason);
            UpstreamError::Status { status, message }
        }
        ureq::Error::Transport(transport) => UpstreamError::Transport(transport.to_string()),
    }
}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: Option<String>,
}

/// Pulls `error.message` out of a Google API error body, if it has one.
pub(crate) fn google_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<GoogleErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_error_message_reads_nested_message() {
        let body = r#"{"error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota."}}"#;
        assert_eq!(
            google_error_message(body).as_deref(),
            Some("The request cannot be completed because you have exceeded your quota.")
        );
    }

    #[test]
    fn read_limited_rejects_oversized_bodies() {
        let body = vec![7u8; 16];
        assert_eq!(read_limited(&body[..], 16, "https://img.test/a.jpg").unwrap(), body);

        let err = read_limited(&body[..], 15, "https://img.test/a.jpg").unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(ref msg) if msg.contains("exceeds limit")));
    }

    #[test]
    fn google_error_message_ignores_other_bodies() {
        assert_eq!(google_error_message("<html>bad gateway</html>"), None);
        assert_eq!(google_error_message(r#"{"error": {"code": 500}}"#), None);
    }
}
