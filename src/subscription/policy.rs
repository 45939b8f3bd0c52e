use serde::{Deserialize, Serialize};

/// What `add` does when the subscription already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Second add is a no-op
    #[default]
    Ignore,
    /// Second add is reported as invalid input
    Reject,
}

/// What `delete` does when the subscription does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    #[default]
    Ignore,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct SubscriptionPolicy {
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    #[serde(default)]
    pub missing_delete_policy: MissingPolicy,
}
