//! Response bodies owned by the API layer.
//!
//! Subscription payloads are not modelled here: read endpoints forward the
//! manager's JSON verbatim (see [`crate::subscription::SubscriptionRecord`]).

use serde::Serialize;
use std::collections::BTreeMap;

use crate::observability::MetricsSnapshot;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: BTreeMap<String, String>,
    pub version: String,
    pub requests: MetricsSnapshot,
}
