/*
 * Responsibility
 * - 環境変数や設定の読み込み (JWT_SECRET, DATABASE_URL, CORS 許可, frontend base URL など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - secret は起動時に一度だけ読み、AuthConfig として明示的に渡す
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::frontend::DEFAULT_API_BASE_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Where user records are looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserStoreKind {
    Postgres { database_url: String },
    // No database; starts empty. Meant for local smoke runs.
    Memory,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Settings consumed by the authenticator.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub leeway_seconds: u64,
    pub user_lookup_timeout: Duration,
    /// Report an unknown subject as an invalid token (401) instead of 404.
    pub conceal_unknown_user: bool,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("leeway_seconds", &self.leeway_seconds)
            .field("user_lookup_timeout", &self.user_lookup_timeout)
            .field("conceal_unknown_user", &self.conceal_unknown_user)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub user_store: UserStoreKind,
    pub auth: AuthConfig,

    pub frontend_api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let user_store = match std::env::var("USER_STORE")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" | "pg" => UserStoreKind::Postgres {
                database_url: std::env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            },
            "memory" => UserStoreKind::Memory,
            _ => return Err(ConfigError::Invalid("USER_STORE")),
        };

        let auth = Self::auth_from_env()?;

        let frontend_api_base_url = std::env::var("FRONTEND_API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            user_store,
            auth,
            frontend_api_base_url,
        })
    }

    fn auth_from_env() -> Result<AuthConfig, ConfigError> {
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let leeway_seconds = match std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS") {
            Ok(v) => v
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))?,
            Err(_) => 0,
        };

        let timeout_ms = match std::env::var("USER_LOOKUP_TIMEOUT_MS") {
            Ok(v) => v
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::Invalid("USER_LOOKUP_TIMEOUT_MS"))?,
            Err(_) => 5_000,
        };

        let conceal_unknown_user = match std::env::var("AUTH_CONCEAL_UNKNOWN_USER") {
            Ok(v) => parse_bool(&v).ok_or(ConfigError::Invalid("AUTH_CONCEAL_UNKNOWN_USER"))?,
            Err(_) => false,
        };

        Ok(AuthConfig {
            jwt_secret,
            leeway_seconds,
            user_lookup_timeout: Duration::from_millis(timeout_ms),
            conceal_unknown_user,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
