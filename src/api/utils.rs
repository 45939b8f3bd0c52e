//! API utility functions
//!
//! Stateless helpers shared by the subscription handlers.

use std::time::Duration;

use axum::body::Body;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::api::error::ApiError;

/// Cache-Control value for a response cacheable for `max_age`
///
/// Read endpoints return caller-scoped data and use a zero max-age.
pub fn build_cache_control_header(max_age: Duration) -> String {
    format!("max-age={}", max_age.as_secs())
}

/// Parses and validates Content-Type header for application/json
///
/// Accepts `application/json` with optional parameters; rejects
/// `application/jsonp`, `text/json` and malformed media types.
pub fn parse_content_type(content_type: &str) -> Result<mime::Mime, ApiError> {
    let media_type: mime::Mime = content_type.parse().map_err(|_| {
        ApiError::InvalidPayload(format!("invalid Content-Type: {}", content_type))
    })?;

    if media_type.type_() != mime::APPLICATION || media_type.subtype() != mime::JSON {
        return Err(ApiError::InvalidPayload(format!(
            "Content-Type must be application/json, got: {}/{}",
            media_type.type_(),
            media_type.subtype()
        )));
    }

    Ok(media_type)
}

/// Collects a request body, failing once it grows past `max_size` bytes
pub async fn read_body(body: Body, max_size: usize) -> Result<Bytes, ApiError> {
    let collected = Limited::new(body, max_size).collect().await.map_err(|err| {
        if err.downcast_ref::<LengthLimitError>().is_some() {
            ApiError::PayloadTooLarge(max_size)
        } else {
            ApiError::InvalidPayload(format!("failed to read body: {}", err))
        }
    })?;

    Ok(collected.to_bytes())
}
