use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::keys::{
    SEPARATOR, encode_subscription_key, encode_user_package_prefix, encode_user_prefix,
};
use super::manager::{ManagerError, Result, SubscriptionManager};
use super::policy::{DuplicatePolicy, MissingPolicy, SubscriptionPolicy};
use super::types::{EventKind, RequestContext, Subscription, SubscriptionRecord};

/// Fjall-backed subscription manager
#[derive(Clone)]
pub struct FjallManager {
    keyspace: Keyspace,
    subscriptions: PartitionHandle,
    policy: SubscriptionPolicy,
    // Serialises check-then-write so policies see a consistent view
    write_lock: Arc<Mutex<()>>,
}

/// Validated identity of a subscription row
struct SubscriptionKey {
    user_id: String,
    package_id: Uuid,
    event_kind: EventKind,
}

impl SubscriptionKey {
    fn encode(&self) -> Vec<u8> {
        encode_subscription_key(
            &self.user_id,
            &self.package_id.to_string(),
            self.event_kind.code(),
        )
    }
}

impl FjallManager {
    /// Open or create a subscription store at the given path
    pub fn open<P: AsRef<Path>>(path: P, policy: SubscriptionPolicy) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening subscription store at: {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open()?;
        let subscriptions =
            keyspace.open_partition("subscriptions", PartitionCreateOptions::default())?;

        info!(?policy, "Subscription store opened");
        Ok(Self {
            keyspace,
            subscriptions,
            policy,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(fjall::PersistMode::SyncAll)?;
        Ok(())
    }

    fn validate(ctx: &RequestContext, subscription: &Subscription) -> Result<SubscriptionKey> {
        let user_id = validate_user(ctx)?;
        if subscription.user_id != user_id {
            return Err(ManagerError::invalid_input(
                "subscription user does not match caller",
            ));
        }

        let package_id = parse_package_id(&subscription.package_id)?;
        let event_kind = EventKind::try_from(subscription.event_kind).map_err(|kind| {
            ManagerError::invalid_input(format!("unknown event kind: {kind}"))
        })?;

        Ok(SubscriptionKey {
            user_id: user_id.to_string(),
            package_id,
            event_kind,
        })
    }

    fn collect_json(&self, prefix: Vec<u8>) -> Result<Bytes> {
        let mut records = Vec::new();
        for item in self.subscriptions.prefix(prefix) {
            let (_, value) = item?;
            let record: SubscriptionRecord = serde_json::from_slice(&value)?;
            records.push(record);
        }
        Ok(Bytes::from(serde_json::to_vec(&records)?))
    }
}

fn validate_user(ctx: &RequestContext) -> Result<&str> {
    let user_id = ctx.user_id.as_str();
    if user_id.is_empty() || user_id.contains(SEPARATOR) {
        return Err(ManagerError::invalid_input("invalid user id"));
    }
    Ok(user_id)
}

fn parse_package_id(package_id: &str) -> Result<Uuid> {
    Uuid::parse_str(package_id)
        .map_err(|_| ManagerError::invalid_input(format!("invalid package id: {package_id}")))
}

#[async_trait]
impl SubscriptionManager for FjallManager {
    async fn add(&self, ctx: &RequestContext, subscription: &Subscription) -> Result<()> {
        let key = Self::validate(ctx, subscription)?;
        let encoded = key.encode();

        let _guard = self.write_lock.lock().await;
        if self.subscriptions.contains_key(&encoded)? {
            return match self.policy.duplicate_policy {
                DuplicatePolicy::Ignore => {
                    debug!(request_id = %ctx.request_id, "Subscription already exists");
                    Ok(())
                }
                DuplicatePolicy::Reject => {
                    Err(ManagerError::invalid_input("subscription already exists"))
                }
            };
        }

        let record = SubscriptionRecord {
            package_id: key.package_id,
            event_kind: key.event_kind.code(),
            created_at: chrono::Utc::now(),
        };
        self.subscriptions
            .insert(encoded, serde_json::to_vec(&record)?)?;
        debug!(
            request_id = %ctx.request_id,
            user_id = %key.user_id,
            package_id = %key.package_id,
            event_kind = ?key.event_kind,
            "Added subscription"
        );
        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, subscription: &Subscription) -> Result<()> {
        let key = Self::validate(ctx, subscription)?;
        let encoded = key.encode();

        let _guard = self.write_lock.lock().await;
        if !self.subscriptions.contains_key(&encoded)? {
            return match self.policy.missing_delete_policy {
                MissingPolicy::Ignore => Ok(()),
                MissingPolicy::Reject => Err(ManagerError::invalid_input("subscription not found")),
            };
        }

        self.subscriptions.remove(encoded)?;
        debug!(
            request_id = %ctx.request_id,
            user_id = %key.user_id,
            package_id = %key.package_id,
            event_kind = ?key.event_kind,
            "Deleted subscription"
        );
        Ok(())
    }

    async fn get_by_package_json(&self, ctx: &RequestContext, package_id: &str) -> Result<Bytes> {
        let user_id = validate_user(ctx)?;
        let package_id = parse_package_id(package_id)?;
        self.collect_json(encode_user_package_prefix(user_id, &package_id.to_string()))
    }

    async fn get_by_user_json(&self, ctx: &RequestContext) -> Result<Bytes> {
        let user_id = validate_user(ctx)?;
        self.collect_json(encode_user_prefix(user_id))
    }
}
