//! Caller identity plumbing
//!
//! [`require_user`] stands in for the routing layer: it trusts the identity
//! header set by the authenticating gateway and stores a [`UserId`] in the
//! request extensions. Handlers read it back through the [`Caller`] extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use super::{error::ApiError, state::AppState};
use crate::subscription::{RequestContext, UserId};

/// Middleware rejecting requests without a caller identity
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = request
        .headers()
        .get(&state.user_id_header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(UserId::new)
        .ok_or_else(|| ApiError::Unauthorized("missing caller identity".to_string()))?;

    request.extensions_mut().insert(user_id);
    Ok(next.run(request).await)
}

/// Request context built from the identity placed in the extensions
pub struct Caller(pub RequestContext);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .extensions
            .get::<UserId>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("missing caller identity".to_string()))?;

        Ok(Caller(RequestContext::new(user_id)))
    }
}
