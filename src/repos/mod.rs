/*
 * Responsibility
 * - 永続化層 (users) の公開窓口
 */
pub mod error;
pub mod user_repo;

pub use user_repo::{InMemoryUserStore, PgUserStore, UserRecord, UserStore};
