//! Recording subscription manager for tests and local development

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;

use super::manager::{ManagerError, Result, SubscriptionManager};
use super::types::{RequestContext, Subscription};

/// One call observed by [`RecordingManager`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerCall {
    Add { user_id: String, subscription: Subscription },
    Delete { user_id: String, subscription: Subscription },
    GetByPackage { user_id: String, package_id: String },
    GetByUser { user_id: String },
}

/// Scripted outcome returned by every call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Success,
    InvalidInput,
    Failure,
}

/// Manager double that records calls and returns a scripted outcome
#[derive(Debug, Default)]
pub struct RecordingManager {
    outcome: Outcome,
    payload: Bytes,
    calls: Mutex<Vec<ManagerCall>>,
}

impl RecordingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Payload returned by the read operations on success
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn calls(&self) -> Vec<ManagerCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: ManagerCall) -> Result<()> {
        tracing::debug!(?call, outcome = ?self.outcome, "Recording manager call");
        self.calls
            .lock()
            .map_err(|_| ManagerError::Internal("call log poisoned".into()))?
            .push(call);

        match self.outcome {
            Outcome::Success => Ok(()),
            Outcome::InvalidInput => Err(ManagerError::invalid_input("scripted invalid input")),
            Outcome::Failure => Err(ManagerError::Internal("fake database failure".into())),
        }
    }
}

#[async_trait]
impl SubscriptionManager for RecordingManager {
    async fn add(&self, ctx: &RequestContext, subscription: &Subscription) -> Result<()> {
        self.record(ManagerCall::Add {
            user_id: ctx.user_id.to_string(),
            subscription: subscription.clone(),
        })
    }

    async fn delete(&self, ctx: &RequestContext, subscription: &Subscription) -> Result<()> {
        self.record(ManagerCall::Delete {
            user_id: ctx.user_id.to_string(),
            subscription: subscription.clone(),
        })
    }

    async fn get_by_package_json(&self, ctx: &RequestContext, package_id: &str) -> Result<Bytes> {
        self.record(ManagerCall::GetByPackage {
            user_id: ctx.user_id.to_string(),
            package_id: package_id.to_string(),
        })?;
        Ok(self.payload.clone())
    }

    async fn get_by_user_json(&self, ctx: &RequestContext) -> Result<Bytes> {
        self.record(ManagerCall::GetByUser {
            user_id: ctx.user_id.to_string(),
        })?;
        Ok(self.payload.clone())
    }
}
