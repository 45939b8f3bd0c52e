use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of an authenticated caller.
///
/// Only the identity middleware constructs this from a trusted source; it is
/// never read from a request body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-request context handed to every [`SubscriptionManager`] call.
///
/// Carries the caller identity alongside (never inside) the domain record.
///
/// [`SubscriptionManager`]: super::SubscriptionManager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: UserId,
    pub request_id: Uuid,
}

impl RequestContext {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            request_id: Uuid::now_v7(),
        }
    }
}

/// Subscription record as exchanged with callers.
///
/// `event_kind` stays a raw integer here: the set of known kinds is owned by
/// the manager, which reports unknown values as invalid input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub package_id: String,
    #[serde(default)]
    pub event_kind: u8,
}

/// Class of package event a subscription reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum EventKind {
    NewRelease = 0,
    SecurityAlert = 1,
}

impl EventKind {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for EventKind {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventKind::NewRelease),
            1 => Ok(EventKind::SecurityAlert),
            other => Err(other),
        }
    }
}

/// Persisted form of a subscription, also the element type of read payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub package_id: Uuid,
    pub event_kind: u8,
    pub created_at: DateTime<Utc>,
}
