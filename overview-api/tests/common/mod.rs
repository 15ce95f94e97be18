/// Common test utilities for integration tests
///
/// Builds the full router over an in-memory document store, seeds a login
/// account, and offers request helpers.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response},
};
use chrono::Duration;
use overview_api::{
    app::{build_router, AppState},
    config::Config,
};
use overview_shared::{
    auth::{
        password::{hash_password, sha256_hex},
        session::{sign_session, SessionIdentity},
    },
    models::user::{UserRecord, USERS_COLLECTION},
    store::{memory::MemoryDocumentStore, DocumentStore},
};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret-of-32-bytes!!";
pub const PASSWORD: &str = "correct horse battery";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryDocumentStore>,
    pub app: axum::Router,
    pub config: Config,
    pub user: UserRecord,
}

impl TestContext {
    /// Creates a context with one Argon2 user, `ana@example.com`
    pub async fn new() -> Self {
        Self::with_env(&[]).await
    }

    /// Creates a context with extra configuration variables
    pub async fn with_env(extra: &[(&str, &str)]) -> Self {
        let config = Config::from_lookup(|key| {
            extra
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .or_else(|| match key {
                    "DATABASE_URL" => Some("postgresql://unused/overview".to_string()),
                    "AUTH_SECRET" => Some(SECRET.to_string()),
                    _ => None,
                })
        })
        .expect("test config should load");

        let store = Arc::new(MemoryDocumentStore::new());

        let user = UserRecord::new(
            "a_ana0001",
            "Ana@Example.com",
            hash_password(PASSWORD).unwrap(),
            Some("Ana".to_string()),
        );
        store
            .insert(USERS_COLLECTION, serde_json::to_value(&user).unwrap())
            .await
            .unwrap();

        let app = build_router(AppState::new(store.clone(), config.clone()));

        Self {
            store,
            app,
            config,
            user,
        }
    }

    /// Adds a user whose stored password is a SHA-256 hex digest
    pub async fn add_legacy_user(&self, email: &str, password: &str) {
        let user = UserRecord::new("a_legacy01", email, sha256_hex(password), None);
        self.store
            .insert(USERS_COLLECTION, serde_json::to_value(&user).unwrap())
            .await
            .unwrap();
    }

    /// A valid session token for the seeded user
    pub fn session_token(&self) -> String {
        let identity = SessionIdentity::new(
            self.user.id.clone(),
            self.user.email.clone(),
            self.user.name.clone(),
        );
        sign_session(&identity, Duration::hours(1), SECRET).unwrap()
    }

    /// `Cookie` header value carrying a valid session
    pub fn session_cookie(&self) -> String {
        format!("session_token={}", self.session_token())
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Sends an authenticated request with an optional JSON body
    pub async fn authed(&self, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, self.session_cookie());
        self.send(with_json(builder, body)).await
    }
}

/// Builds a request with an optional JSON body
pub fn with_json(builder: axum::http::request::Builder, body: Option<Value>) -> Request<Body> {
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a response body as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A valid task document
pub fn task_json(id: &str, assignee: Option<&str>) -> Value {
    let mut doc = serde_json::json!({
        "id": id,
        "title": format!("Task {id}"),
        "status": "Pendente",
        "priority": "Média",
        "workType": "App",
        "origin": "Interno",
        "subprojectId": "s_1"
    });
    if let Some(name) = assignee {
        doc["assignee"] = Value::String(name.to_string());
    }
    doc
}
