//! API endpoint map handed to the browser client.
//!
//! Every URL is derived from a single base URL so the frontend never
//! hard-codes hosts. Two entries depend on an email address and are exposed
//! as methods instead of fixed strings.

use serde::Serialize;
use url::{Url, form_urlencoded};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, thiserror::Error)]
#[error("invalid api base url {raw:?}: {source}")]
pub struct EndpointError {
    raw: String,
    source: url::ParseError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoints {
    pub base_url: String,
    pub register: String,
    pub login: String,
    pub logout: String,
    pub me: String,
    pub verify_otp: String,
    pub jobs: String,
    pub post_job: String,
    pub my_applications: String,
    pub apply_job: String,
}

impl ApiEndpoints {
    pub fn new(base_url: &str) -> Result<Self, EndpointError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        Url::parse(trimmed).map_err(|source| EndpointError {
            raw: base_url.to_string(),
            source,
        })?;

        Ok(Self::from_trimmed(trimmed))
    }

    fn from_trimmed(trimmed: &str) -> Self {
        let at = |path: &str| format!("{trimmed}{path}");

        Self {
            base_url: trimmed.to_string(),
            register: at("/api/user/register"),
            login: at("/api/user/login"),
            logout: at("/api/user/logout"),
            me: at("/api/user/me"),
            verify_otp: at("/api/user/verify-otp"),
            jobs: at("/api/job/all"),
            post_job: at("/api/job/post"),
            my_applications: at("/api/application/mine"),
            apply_job: at("/api/application/apply"),
        }
    }

    /// Same as [`ApiEndpoints::new`], but a bad base URL falls back to the default.
    pub fn new_or_default(base_url: &str) -> Self {
        match Self::new(base_url) {
            Ok(endpoints) => endpoints,
            Err(err) => {
                tracing::warn!(error = %err, "falling back to default api base url");
                Self::default()
            }
        }
    }

    pub fn resend_otp(&self, email: &str) -> String {
        self.with_email("/api/user/resend-otp", email)
    }

    pub fn user_by_email(&self, email: &str) -> String {
        self.with_email("/api/user/by-email", email)
    }

    fn with_email(&self, path: &str, email: &str) -> String {
        let email: String = form_urlencoded::byte_serialize(email.as_bytes()).collect();
        format!("{}{path}?email={email}", self.base_url)
    }
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self::from_trimmed(DEFAULT_API_BASE_URL)
    }
}
