//! # Envelope Boundary
//!
//! The backend answers in two shapes depending on the endpoint and its
//! release:
//!
//! ```text
//! bare:     { "id": 77, "totalAmount": 1000, ... }
//! wrapped:  { "success": true, "data": { "id": 77, ... } }
//! failure:  { "success": false, "message": "Insufficient stock" }
//! ```
//!
//! Every response body passes through [`unwrap_body`] exactly once. Nothing
//! past this module ever looks at `success` or `data` again.

use serde_json::{Map, Value};

use crate::error::{RemoteError, RemoteResult};

const FALLBACK_MESSAGE: &str = "request rejected";

/// Parses a body and strips the envelope, returning the payload.
///
/// An empty body yields `Value::Null`; a body reporting `success: false`
/// (or carrying only an `error`) yields [`RemoteError::Rejected`].
pub fn unwrap_body(body: &str) -> RemoteResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_str(body)?;
    unwrap_value(value)
}

/// Strips the envelope from an already-parsed value.
pub fn unwrap_value(value: Value) -> RemoteResult<Value> {
    let mut map = match value {
        Value::Object(map) => map,
        other => return Ok(other),
    };

    if is_rejection(&map) {
        return Err(RemoteError::Rejected(error_message(&map)));
    }

    match map.remove("data") {
        Some(data) if !data.is_null() => Ok(data),
        Some(data) => {
            // `{ "success": true, "data": null }` is an ack with no payload
            if map.contains_key("success") {
                Ok(Value::Null)
            } else {
                map.insert("data".to_string(), data);
                Ok(Value::Object(map))
            }
        }
        None => Ok(Value::Object(map)),
    }
}

/// Best human-readable message from an error body.
///
/// Looks at `message`, then `error` (string or `{ message }`), then
/// `errors[0]`.
pub fn error_message(map: &Map<String, Value>) -> String {
    let text = |v: &Value| -> Option<String> {
        match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Object(inner) => inner
                .get("message")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            _ => None,
        }
    };

    map.get("message")
        .and_then(text)
        .or_else(|| map.get("error").and_then(text))
        .or_else(|| {
            map.get("errors")
                .and_then(Value::as_array)
                .and_then(|errors| errors.first())
                .and_then(text)
        })
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}

/// Message for a non-2xx body, which may or may not be JSON.
pub fn status_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => error_message(&map),
        _ if !body.trim().is_empty() => body.trim().chars().take(200).collect(),
        _ => FALLBACK_MESSAGE.to_string(),
    }
}

fn is_rejection(map: &Map<String, Value>) -> bool {
    match map.get("success") {
        Some(Value::Bool(false)) => true,
        Some(_) => false,
        None => {
            let has_error = map.get("error").is_some_and(|e| !e.is_null() && e != false);
            has_error && !map.contains_key("data") && !map.contains_key("id")
        }
    }
}
