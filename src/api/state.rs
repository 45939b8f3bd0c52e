use std::sync::Arc;

use axum::http::HeaderName;

use super::error::ApiError;
use crate::config::{Config, ValidationError};
use crate::observability::Metrics;
use crate::subscription::{RequestContext, SubscriptionManager};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub manager: Arc<dyn SubscriptionManager>,
    pub metrics: Arc<Metrics>,
    pub user_id_header: HeaderName,
}

impl AppState {
    pub fn new(
        config: Config,
        manager: Arc<dyn SubscriptionManager>,
    ) -> Result<Self, ValidationError> {
        let user_id_header = HeaderName::from_bytes(config.auth.user_id_header.as_bytes())
            .map_err(|_| ValidationError::InvalidUserIdHeader {
                header: config.auth.user_id_header.clone(),
            })?;

        Ok(Self {
            config: Arc::new(config),
            manager,
            metrics: Arc::new(Metrics::new()),
            user_id_header,
        })
    }

    pub fn max_body_bytes(&self) -> usize {
        self.config.server.max_body_bytes.as_usize()
    }

    /// Log and count the outcome of one subscription operation
    pub fn observe<T>(
        &self,
        ctx: &RequestContext,
        operation: &'static str,
        result: Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        if let Err(err) = &result {
            if err.is_server_fault() {
                self.metrics.server_error();
                tracing::error!(
                    request_id = %ctx.request_id,
                    user_id = %ctx.user_id,
                    operation,
                    error = %err,
                    "Subscription operation failed"
                );
            } else {
                self.metrics.client_error();
                tracing::debug!(
                    request_id = %ctx.request_id,
                    operation,
                    error = %err,
                    "Subscription request rejected"
                );
            }
        }
        result
    }
}
