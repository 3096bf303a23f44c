//! Decode one transport round-trip body into a typed outcome.
//!
//! The endpoint replies with a JSON object carrying at least a `success` flag
//! (`0`/`1` or boolean) and optionally a `message`. Anything that fails to
//! parse is normalized into a failure outcome carrying the raw body, so the
//! engine only ever sees a typed result.

use serde_json::Value;

/// Result of one transfer: server-reported success flag, optional message,
/// and the full decoded payload for the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerResponse {
    pub success: bool,
    pub message: Option<String>,
    pub payload: Value,
}

/// Parse-or-wrap: decode the body as JSON, falling back to
/// `{ success: 0, message: <raw body> }` for non-JSON responses.
///
/// Only an explicit `success` of `0` or `false` marks a failure; a missing or
/// unrecognized flag counts as success, matching the endpoint contract.
pub fn decode_body(body: &str) -> ServerResponse {
    match serde_json::from_str::<Value>(body) {
        Ok(payload) => {
            let success = match payload.get("success") {
                Some(Value::Bool(flag)) => *flag,
                Some(Value::Number(n)) => n.as_i64() != Some(0),
                _ => true,
            };
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned);
            ServerResponse {
                success,
                message,
                payload,
            }
        }
        Err(_) => ServerResponse {
            success: false,
            message: Some(body.to_owned()),
            payload: serde_json::json!({ "success": 0, "message": body }),
        },
    }
}
