//! Unverified identity-token decoding.
//!
//! # SECURITY
//! `decode_unverified_claims` reads the payload segment of a compact token
//! (`header.payload.signature`) WITHOUT checking the signature. Its output
//! is a self-asserted claim map used only to attribute log records to a
//! username. It must never gate access, and it deliberately shares no code
//! with any token verification path.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};
use thiserror::Error;

/// Error produced when a token is structurally invalid.
#[derive(Debug, Error)]
pub enum ClaimsDecodeError {
    #[error("expected 3 token segments, found {0}")]
    SegmentCount(usize),

    #[error("claims segment is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("claims segment is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("claims payload is not a JSON object")]
    NotAnObject,
}

/// Decode the claim map from a compact token, without any verification.
///
/// Fails when the token does not have exactly three `.`-separated segments,
/// when the payload segment is not base64url, or when the decoded payload
/// is not a JSON object.
pub fn decode_unverified_claims(token: &str) -> Result<Map<String, Value>, ClaimsDecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(ClaimsDecodeError::SegmentCount(segments.len()));
    }

    let payload = URL_SAFE_NO_PAD.decode(segments[1])?;
    match serde_json::from_slice::<Value>(&payload)? {
        Value::Object(map) => Ok(map),
        _ => Err(ClaimsDecodeError::NotAnObject),
    }
}

/// Find a named cookie in a `Cookie` header value.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim())
    })
}
