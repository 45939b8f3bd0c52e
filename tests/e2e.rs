//! End-to-end tests against the fjall-backed manager
//!
//! These drive the full router (identity middleware, handlers, store) and
//! check what a caller observes across requests:
//! 1. Add a subscription
//! 2. Read it back through GetByUser / GetByPackage
//! 3. Delete it and confirm it is gone

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use hubsub::api::{router, state::AppState};
use hubsub::config::Config;
use hubsub::subscription::{FjallManager, SubscriptionRecord};

const PACKAGE: &str = "00000000-0000-0000-0000-000000000001";

struct TestApp {
    app: Router,
    _temp_dir: TempDir,
}

impl TestApp {
    fn new(config_toml: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = Config::from_toml(config_toml).expect("Failed to parse test config");
        let manager = FjallManager::open(temp_dir.path().join("subscriptions"), config.subscriptions)
            .expect("Failed to open test store");
        let state = AppState::new(config, Arc::new(manager)).expect("Failed to build app state");

        Self {
            app: router(state),
            _temp_dir: temp_dir,
        }
    }

    async fn send(&self, user: &str, method: Method, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .uri(uri)
            .method(method)
            .header("x-hub-user-id", user)
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        (status, body)
    }

    async fn records(&self, user: &str, uri: &str) -> Vec<SubscriptionRecord> {
        let (status, body) = self.send(user, Method::GET, uri, "").await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).unwrap()
    }
}

fn subscription_body(event_kind: u8) -> String {
    format!(r#"{{"package_id": "{PACKAGE}", "event_kind": {event_kind}}}"#)
}

#[tokio::test]
async fn test_added_subscription_is_visible_to_caller() {
    let app = TestApp::new("");

    let (status, body) = app
        .send("alice", Method::POST, "/api/v1/subscriptions", &subscription_body(0))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let records = app.records("alice", "/api/v1/subscriptions").await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].package_id.to_string(), PACKAGE);
    assert_eq!(records[0].event_kind, 0);

    // Other callers see nothing
    assert!(app.records("bob", "/api/v1/subscriptions").await.is_empty());
}

#[tokio::test]
async fn test_add_is_idempotent_by_default() {
    let app = TestApp::new("");

    for _ in 0..2 {
        let (status, _) = app
            .send("alice", Method::POST, "/api/v1/subscriptions", &subscription_body(1))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(app.records("alice", "/api/v1/subscriptions").await.len(), 1);
}

#[tokio::test]
async fn test_duplicate_add_rejected_when_configured() {
    let app = TestApp::new("[subscriptions]\nduplicate_policy = \"reject\"\n");

    let (first, _) = app
        .send("alice", Method::POST, "/api/v1/subscriptions", &subscription_body(0))
        .await;
    let (second, _) = app
        .send("alice", Method::POST, "/api/v1/subscriptions", &subscription_body(0))
        .await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_by_package() {
    let app = TestApp::new("");

    app.send("alice", Method::POST, "/api/v1/subscriptions", &subscription_body(0))
        .await;
    app.send("alice", Method::POST, "/api/v1/subscriptions", &subscription_body(1))
        .await;

    let uri = format!("/api/v1/subscriptions/{PACKAGE}");
    let records = app.records("alice", &uri).await;
    let kinds: Vec<u8> = records.iter().map(|r| r.event_kind).collect();
    assert_eq!(kinds, vec![0, 1]);

    let other = "/api/v1/subscriptions/00000000-0000-0000-0000-000000000002";
    assert!(app.records("alice", other).await.is_empty());

    let (status, _) = app
        .send("alice", Method::GET, "/api/v1/subscriptions/packageID", "")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_subscription() {
    let app = TestApp::new("");

    app.send("alice", Method::POST, "/api/v1/subscriptions", &subscription_body(0))
        .await;
    let (status, _) = app
        .send("alice", Method::DELETE, "/api/v1/subscriptions", &subscription_body(0))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.records("alice", "/api/v1/subscriptions").await.is_empty());

    // Deleting again is a no-op under the default policy
    let (status, _) = app
        .send("alice", Method::DELETE, "/api/v1/subscriptions", &subscription_body(0))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_missing_rejected_when_configured() {
    let app = TestApp::new("[subscriptions]\nmissing_delete_policy = \"reject\"\n");

    let (status, _) = app
        .send("alice", Method::DELETE, "/api/v1/subscriptions", &subscription_body(0))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_input_reaches_caller_as_bad_request() {
    let app = TestApp::new("");

    let (bad_package, _) = app
        .send(
            "alice",
            Method::POST,
            "/api/v1/subscriptions",
            r#"{"package_id": "invalid"}"#,
        )
        .await;
    assert_eq!(bad_package, StatusCode::BAD_REQUEST);

    let unknown_kind = format!(r#"{{"package_id": "{PACKAGE}", "event_kind": 9}}"#);
    let (bad_kind, _) = app
        .send("alice", Method::POST, "/api/v1/subscriptions", &unknown_kind)
        .await;
    assert_eq!(bad_kind, StatusCode::BAD_REQUEST);

    assert!(app.records("alice", "/api/v1/subscriptions").await.is_empty());
}
