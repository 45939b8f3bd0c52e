use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use super::{
    auth::Caller,
    error::ApiError,
    models::HealthResponse,
    state::AppState,
    utils::{build_cache_control_header, parse_content_type, read_body},
};
use crate::subscription::{RequestContext, Subscription};

/// Register a subscription for the caller (POST /api/v1/subscriptions)
///
/// The body must decode into a [`Subscription`]; decode failures are rejected
/// before the manager is called. `user_id` always comes from the caller
/// context, overriding any value in the body.
pub async fn add(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    headers: HeaderMap,
    body: Body,
) -> Result<StatusCode, ApiError> {
    let result = add_subscription(&state, &ctx, &headers, body).await;
    state.observe(&ctx, "add", result)?;
    state.metrics.write_accepted();
    Ok(StatusCode::OK)
}

async fn add_subscription(
    state: &AppState,
    ctx: &RequestContext,
    headers: &HeaderMap,
    body: Body,
) -> Result<(), ApiError> {
    let subscription = decode_subscription(state, ctx, headers, body).await?;
    state.manager.add(ctx, &subscription).await?;
    Ok(())
}

/// Remove one of the caller's subscriptions (DELETE /api/v1/subscriptions)
///
/// Same decoding rules as [`add`]. Whether a missing subscription is an error
/// is up to the manager.
pub async fn delete(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    headers: HeaderMap,
    body: Body,
) -> Result<StatusCode, ApiError> {
    let result = delete_subscription(&state, &ctx, &headers, body).await;
    state.observe(&ctx, "delete", result)?;
    state.metrics.write_accepted();
    Ok(StatusCode::OK)
}

async fn delete_subscription(
    state: &AppState,
    ctx: &RequestContext,
    headers: &HeaderMap,
    body: Body,
) -> Result<(), ApiError> {
    let subscription = decode_subscription(state, ctx, headers, body).await?;
    state.manager.delete(ctx, &subscription).await?;
    Ok(())
}

/// Caller's subscriptions on a package (GET /api/v1/subscriptions/{packageID})
pub async fn get_by_package(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(package_id): Path<String>,
) -> Result<Response, ApiError> {
    let result = state
        .manager
        .get_by_package_json(&ctx, &package_id)
        .await
        .map_err(ApiError::from);
    let payload = state.observe(&ctx, "get_by_package", result)?;
    state.metrics.read_served();
    Ok(json_payload(payload))
}

/// All of the caller's subscriptions (GET /api/v1/subscriptions)
///
/// There is no caller-supplied identifier to validate, so every manager
/// failure is a server fault.
pub async fn get_by_user(
    State(state): State<AppState>,
    Caller(ctx): Caller,
) -> Result<Response, ApiError> {
    let result = state
        .manager
        .get_by_user_json(&ctx)
        .await
        .map_err(ApiError::internal);
    let payload = state.observe(&ctx, "get_by_user", result)?;
    state.metrics.read_served();
    Ok(json_payload(payload))
}

/// Health check endpoint (GET /health)
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let mut components = BTreeMap::new();
    components.insert("api".to_string(), "healthy".to_string());
    components.insert("subscriptions".to_string(), "healthy".to_string());

    let response = HealthResponse {
        status: "healthy".to_string(),
        components,
        version: env!("CARGO_PKG_VERSION").to_string(),
        requests: state.metrics.snapshot(),
    };

    (StatusCode::OK, Json(response))
}

/// Reads, checks and decodes a subscription body, stamping the caller id
async fn decode_subscription(
    state: &AppState,
    ctx: &RequestContext,
    headers: &HeaderMap,
    body: Body,
) -> Result<Subscription, ApiError> {
    // A missing Content-Type is accepted; a wrong one is not
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        let content_type = content_type
            .to_str()
            .map_err(|_| ApiError::InvalidPayload("invalid Content-Type header".into()))?;
        parse_content_type(content_type)?;
    }

    let body = read_body(body, state.max_body_bytes()).await?;
    let mut subscription: Subscription = serde_json::from_slice(&body)?;
    subscription.user_id = ctx.user_id.to_string();
    Ok(subscription)
}

/// Manager payload forwarded as-is
fn json_payload(payload: Bytes) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string()),
            (
                header::CACHE_CONTROL,
                build_cache_control_header(Duration::ZERO),
            ),
        ],
        payload,
    )
        .into_response()
}
