use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use super::types::{RequestContext, Subscription};

#[derive(Debug, Error)]
pub enum ManagerError {
    /// Caller-supplied data the manager can identify as incorrect
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(#[from] fjall::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ManagerError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        ManagerError::InvalidInput(reason.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ManagerError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, ManagerError>;

/// Subscription store used by the HTTP handlers.
///
/// Read operations return a ready-to-send JSON payload; callers pass it
/// through untouched.
#[async_trait]
pub trait SubscriptionManager: Send + Sync {
    /// Register a subscription for `subscription.user_id`
    async fn add(&self, ctx: &RequestContext, subscription: &Subscription) -> Result<()>;

    /// Remove a subscription for `subscription.user_id`
    async fn delete(&self, ctx: &RequestContext, subscription: &Subscription) -> Result<()>;

    /// Caller's subscriptions on one package, as a JSON array
    async fn get_by_package_json(&self, ctx: &RequestContext, package_id: &str) -> Result<Bytes>;

    /// All of the caller's subscriptions, as a JSON array
    async fn get_by_user_json(&self, ctx: &RequestContext) -> Result<Bytes>;
}
