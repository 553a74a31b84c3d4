//! JSON envelope decoding.
//!
//! The service wraps every payload as `{"data": ..., "error": ...}`. Two
//! error conventions coexist: a top-level `error` slot, and an `error` object
//! nested inside an object `data` slot. Both are honoured here; a nested error
//! whose code is 500 is the service's generic sentinel and does not fail.

use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};

const SERVER_ERROR_SENTINEL: u64 = 500;

/// Parse `raw` and return its `data` slot, or the error the envelope reports.
pub fn decode(raw: &[u8]) -> Result<Value> {
    let mut envelope: Value = serde_json::from_slice(raw).map_err(|e| {
        debug!(error = %e, "response body is not JSON");
        ClientError::MalformedResponse(e.to_string())
    })?;

    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        return Err(top_level_error(error, envelope.get("status")));
    }

    let data = envelope
        .as_object_mut()
        .and_then(|obj| obj.remove("data"))
        .unwrap_or(Value::Null);

    if let Some(nested) = data.get("error").filter(|e| !e.is_null()) {
        if code_of(nested) != Some(SERVER_ERROR_SENTINEL) {
            return Err(api_error(nested, None));
        }
    }

    Ok(data)
}

fn top_level_error(error: &Value, status: Option<&Value>) -> ClientError {
    match error {
        Value::String(message) => ClientError::Api {
            message: message.clone(),
            status: status.and_then(as_code).and_then(|c| u16::try_from(c).ok()),
        },
        other => api_error(other, status),
    }
}

fn api_error(error: &Value, fallback_status: Option<&Value>) -> ClientError {
    let message = match error.get("message") {
        Some(Value::String(m)) => m.clone(),
        Some(other) if !other.is_null() => other.to_string(),
        _ => match error {
            Value::String(m) => m.clone(),
            other => other.to_string(),
        },
    };
    let status = code_of(error)
        .or_else(|| fallback_status.and_then(as_code))
        .and_then(|c| u16::try_from(c).ok());
    ClientError::Api { message, status }
}

fn code_of(error: &Value) -> Option<u64> {
    error
        .get("status")
        .and_then(as_code)
        .or_else(|| error.get("code").and_then(as_code))
}

/// Status codes arrive both as numbers and as numeric strings.
fn as_code(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
