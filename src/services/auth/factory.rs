//! Factory: build the user store and `Authenticator` from application `Config`.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

use crate::config::{Config, UserStoreKind};
use crate::error::AppError;
use crate::repos::{InMemoryUserStore, PgUserStore, UserStore};
use crate::services::auth::Authenticator;

pub async fn build_user_store(config: &Config) -> Result<Arc<dyn UserStore>, AppError> {
    match &config.user_store {
        UserStoreKind::Postgres { database_url } => {
            let db = PgPoolOptions::new()
                .max_connections(10)
                .acquire_timeout(config.auth.user_lookup_timeout.max(Duration::from_secs(1)))
                .connect(database_url)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "failed to connect to postgres");
                    AppError::internal("database unavailable")
                })?;

            Ok(Arc::new(PgUserStore::new(db)))
        }
        UserStoreKind::Memory => {
            tracing::warn!("USER_STORE=memory: every lookup misses until users are inserted");
            Ok(Arc::new(InMemoryUserStore::new()))
        }
    }
}

pub fn build_authenticator(config: &Config, users: Arc<dyn UserStore>) -> Arc<Authenticator> {
    Arc::new(Authenticator::new(&config.auth, users))
}
