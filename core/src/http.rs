//! HTTP request/response types and the single-request seam.
//!
//! # Design
//! Requests and responses are plain data. `HttpSend` executes exactly one
//! round-trip and never follows redirects on its own; redirect handling,
//! status classification and the overall deadline live in
//! [`crate::transport`]. This keeps the pipeline testable with scripted
//! senders while `UreqSender` does the real I/O.

use std::io;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// HTTP method for a request. The API is read-only; `Post` carries the
/// batch search query body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: String) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        }
    }

    /// Same request aimed at a different URL (used when following redirects).
    pub fn redirected(&self, url: String) -> Self {
        Self {
            url,
            ..self.clone()
        }
    }
}

/// An HTTP response described as plain data. The body is kept as raw bytes;
/// decoding is the envelope decoder's job.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Executes one HTTP round-trip.
///
/// Implementations must return 3xx/4xx/5xx responses as data, must not follow
/// redirects, and must give up once `timeout` has elapsed with
/// [`ClientError::Timeout`].
pub trait HttpSend {
    fn send(&self, request: &HttpRequest, timeout: Duration) -> Result<HttpResponse>;
}

/// Production sender backed by a blocking `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqSender {
    user_agent: String,
}

impl Default for UreqSender {
    fn default() -> Self {
        Self {
            user_agent: concat!("crunchbase-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl UreqSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl HttpSend for UreqSender {
    fn send(&self, request: &HttpRequest, timeout: Duration) -> Result<HttpResponse> {
        // A fresh agent per call; its connection is dropped with it on every
        // exit path.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();

        let result = match (&request.method, &request.body) {
            (HttpMethod::Get, _) => {
                let mut builder = agent.get(&request.url).header("user-agent", &self.user_agent);
                for (key, value) in &request.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                builder.call()
            }
            (HttpMethod::Post, body) => {
                let mut builder = agent.post(&request.url).header("user-agent", &self.user_agent);
                for (key, value) in &request.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| map_ureq_error(e, timeout))?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| map_ureq_error(e, timeout))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

fn map_ureq_error(err: ureq::Error, timeout: Duration) -> ClientError {
    match err {
        ureq::Error::Timeout(_) => ClientError::Timeout { limit: timeout },
        ureq::Error::Io(e) if e.kind() == io::ErrorKind::TimedOut => {
            ClientError::Timeout { limit: timeout }
        }
        other => ClientError::Network(other.to_string()),
    }
}
