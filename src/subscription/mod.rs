//! Subscription domain: records, the manager trait and its implementations
//!
//! A subscription is a `(user, package, event kind)` triple recording that a
//! caller wants to hear about a class of events on a package.
//!
//! ## Key Components
//!
//! - [`SubscriptionManager`] - store abstraction the HTTP handlers call
//! - [`FjallManager`] - persistent implementation on an embedded fjall keyspace
//! - [`RecordingManager`] - test double recording calls with a scripted outcome
//! - [`RequestContext`] - caller identity passed alongside every call
//!
//! ## Example
//!
//! ```rust,ignore
//! use hubsub::subscription::{FjallManager, RequestContext, SubscriptionPolicy, UserId};
//!
//! let manager = FjallManager::open("data/subscriptions", SubscriptionPolicy::default())?;
//! let ctx = RequestContext::new(UserId::new("user-1"));
//! let payload = manager.get_by_user_json(&ctx).await?;
//! ```

mod keys;
mod manager;
pub mod mock;
mod policy;
mod store;
mod types;

pub use manager::{ManagerError, Result, SubscriptionManager};
pub use mock::{ManagerCall, Outcome, RecordingManager};
pub use policy::{DuplicatePolicy, MissingPolicy, SubscriptionPolicy};
pub use store::FjallManager;
pub use types::{EventKind, RequestContext, Subscription, SubscriptionRecord, UserId};
