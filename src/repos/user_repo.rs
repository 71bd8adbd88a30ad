/*
 * Responsibility
 * - 認証時の user lookup (findById) を提供する
 * - UserStore trait を境界にして、Postgres 実装とインメモリ実装を差し替え可能にする
 * - DB エラーは RepoError として返し、認証失敗への変換は上位に任せる
 */
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::api::v1::extractors::Role;
use crate::repos::error::RepoError;

/// Fields of a user that the auth gate reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub role: Role,
    pub email: String,
    pub name: String,
}

/// Read-only user lookup used by the authenticator.
///
/// Implementations must be safe to share across requests.
#[async_trait]
pub trait UserStore: Send + Sync {
    // Returns the store name (for logging).
    fn backend_name(&self) -> &'static str;

    // `Ok(None)` when no user has this id.
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, RepoError>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    role: String,
    email: String,
    name: String,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            role: Role::from(row.role.as_str()),
            id: row.id,
            email: row.email,
            name: row.name,
        }
    }
}

/// `users` テーブルを読む Postgres 実装
#[derive(Clone, Debug)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, role, email, name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(UserRecord::from))
    }
}

/// HashMap-backed store for tests and database-less local runs.
#[derive(Clone, Debug, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let store = Self::new();
        for user in users {
            store.insert(user);
        }
        store
    }

    pub fn insert(&self, user: UserRecord) {
        // A poisoned lock only means a writer panicked mid-insert; the map is still usable.
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        users.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, RepoError> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        Ok(users.get(id).cloned())
    }
}
