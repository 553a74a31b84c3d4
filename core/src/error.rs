//! Error types for the Crunchbase API client.
//!
//! # Design
//! Every failure the request pipeline can produce has its own variant so
//! callers can match on the kind of failure and read its structured fields
//! (status code, offending tag, hop limit). Nothing is retried internally;
//! each variant is terminal for the call that produced it.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by the client, transport, decoder and resolver.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No `user_key` is configured. Raised before any network call.
    #[error("user key required, visit http://data.crunchbase.com")]
    MissingCredential,

    /// The server answered with a status that is neither a success, a
    /// redirect, nor one of the pass-through statuses (404, 500).
    #[error("HTTP {status}: {reason}")]
    Transport { status: u16, reason: String },

    /// The redirect budget ran out before the chain reached a final response.
    #[error("HTTP redirect too deep (limit {limit})")]
    RedirectLoop { limit: u32 },

    /// The whole fetch, including every redirect hop, exceeded its deadline.
    #[error("request timed out after {limit:?}")]
    Timeout { limit: Duration },

    /// The connection failed before any HTTP status was received.
    #[error("network failure: {0}")]
    Network(String),

    /// The body is not valid JSON, or an attribute has the wrong JSON type.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The envelope itself reported a failure.
    #[error("API error ({}): {message}", status_label(.status))]
    Api { message: String, status: Option<u16> },

    /// A kind tag or item type has no registered constructor.
    #[error("unsupported entity type: {0}")]
    UnsupportedEntity(String),

    /// Nested relationships exceeded the resolver's depth limit.
    #[error("relationship nesting exceeds depth {depth}")]
    RelationshipTooDeep { depth: usize },

    /// A required call argument is missing or empty.
    #[error("missing parameters: {0}")]
    MissingParams(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration value for '{field}': {reason}")]
    Config { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "no status".to_string(), |s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status() {
        let err = ClientError::Api {
            message: "Invalid user key".to_string(),
            status: Some(401),
        };
        assert_eq!(err.to_string(), "API error (401): Invalid user key");
    }

    #[test]
    fn api_error_display_without_status() {
        let err = ClientError::Api {
            message: "boom".to_string(),
            status: None,
        };
        assert_eq!(err.to_string(), "API error (no status): boom");
    }

    #[test]
    fn transport_error_display() {
        let err = ClientError::Transport {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
    }
}
