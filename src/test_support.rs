//! Shared fixtures for unit and router tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use tower::ServiceExt;

use crate::api::v1::extractors::Role;
use crate::config::AuthConfig;
use crate::frontend::ApiEndpoints;
use crate::repos::{InMemoryUserStore, UserRecord, UserStore, error::RepoError};
use crate::services::auth::Authenticator;
use crate::state::AppState;

pub const SECRET: &str = "test-jwt-secret";

pub fn sign_with<T: Serialize>(secret: &str, claims: &T) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to sign test token")
}

/// Valid for ten minutes, signed with [`SECRET`].
pub fn sign(sub: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    sign_with(
        SECRET,
        &serde_json::json!({ "sub": sub, "iat": now, "exp": now + 600 }),
    )
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: SECRET.to_string(),
        leeway_seconds: 0,
        user_lookup_timeout: Duration::from_secs(1),
        conceal_unknown_user: false,
    }
}

/// `42` is a recruiter, `7` is a seeker, `13` has the unrecognized role `admin`.
pub fn seeded_store() -> InMemoryUserStore {
    InMemoryUserStore::with_users([
        UserRecord {
            id: "42".to_string(),
            role: Role::Recruiter,
            email: "rita@example.com".to_string(),
            name: "Rita Recruiter".to_string(),
        },
        UserRecord {
            id: "7".to_string(),
            role: Role::Seeker,
            email: "sam@example.com".to_string(),
            name: "Sam Seeker".to_string(),
        },
        UserRecord {
            id: "13".to_string(),
            role: Role::Other("admin".to_string()),
            email: "ada@example.com".to_string(),
            name: "Ada Admin".to_string(),
        },
    ])
}

pub fn state_with(config: &AuthConfig, users: Arc<dyn UserStore>) -> AppState {
    AppState::new(
        Arc::new(Authenticator::new(config, users)),
        ApiEndpoints::default(),
    )
}

/// Counts `find_by_id` calls on the wrapped store.
pub struct CountingUserStore {
    inner: InMemoryUserStore,
    lookups: AtomicUsize,
}

impl CountingUserStore {
    pub fn new(inner: InMemoryUserStore) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for CountingUserStore {
    fn backend_name(&self) -> &'static str {
        "counting"
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, RepoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }
}

pub struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<UserRecord>, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }
}

/// Sleeps before delegating, to exercise the lookup timeout.
pub struct SlowUserStore {
    inner: InMemoryUserStore,
    delay: Duration,
}

impl SlowUserStore {
    pub fn new(inner: InMemoryUserStore, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl UserStore for SlowUserStore {
    fn backend_name(&self) -> &'static str {
        "slow"
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, RepoError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_id(id).await
    }
}

pub fn get(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).expect("valid test request")
}

pub async fn send(router: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(req).await.expect("infallible router");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, body)
}
