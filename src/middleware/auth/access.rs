//! access token 検証 → Principal を extensions に入れる
//!
//! - token は `token` cookie か `Authorization: Bearer <jwt>` から取る (credential.rs)
//! - 署名/期限の検証と user lookup は Authenticator 側で実施
//! - 成功時のみ Principal を insert して next を一度だけ呼ぶ。失敗時は handler に到達しない

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::middleware::auth::credential::extract_credential;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// 認証が必要な route 群に access middleware を適用する。
///
/// `route_layer` なので、未定義 path への request は認証せずに 404 になる。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/auth/me", get(me));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_credential(req.headers()) else {
        tracing::debug!(uri = %req.uri(), "no access token on request");
        return Err(AppError::MissingCredential);
    };

    let principal = match state.auth.authenticate(&token).await {
        Ok(principal) => principal,
        Err(err) => return Err(rejection(err, state.auth.conceals_unknown_user())),
    };

    // middleware → extractor / role gate への受け渡し
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

fn rejection(err: AuthError, conceal_unknown_user: bool) -> AppError {
    match err {
        AuthError::InvalidToken(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            AppError::InvalidCredential
        }
        AuthError::UserNotFound => {
            tracing::warn!("access token subject has no user record");
            if conceal_unknown_user {
                AppError::InvalidCredential
            } else {
                AppError::UserNotFound
            }
        }
        AuthError::LookupFailed(err) => {
            tracing::error!(error = ?err, "user lookup failed");
            AppError::InvalidCredential
        }
        AuthError::LookupTimedOut(after) => {
            tracing::error!(?after, "user lookup timed out");
            AppError::InvalidCredential
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::{Json, http::StatusCode, routing::get};
    use serde_json::json;

    use super::*;
    use crate::api::v1::extractors::{Principal, PrincipalExtractor};
    use crate::repos::UserStore;
    use crate::test_support::{
        self, CountingUserStore, FailingUserStore, SECRET, SlowUserStore, auth_config,
        seeded_store, send, sign, sign_with, state_with,
    };

    struct Harness {
        router: Router,
        store: Arc<CountingUserStore>,
        downstream: Arc<AtomicUsize>,
    }

    fn harness() -> Harness {
        let store = Arc::new(CountingUserStore::new(seeded_store()));
        let (router, downstream) = router_with(state_with(&auth_config(), store.clone()));
        Harness {
            router,
            store,
            downstream,
        }
    }

    fn router_with(state: AppState) -> (Router, Arc<AtomicUsize>) {
        let downstream = Arc::new(AtomicUsize::new(0));
        let calls = downstream.clone();
        let protected = Router::new().route(
            "/whoami",
            get(move |PrincipalExtractor(principal): PrincipalExtractor| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Json(principal)
                }
            }),
        );
        let router = apply(protected, state.clone()).with_state(state);
        (router, downstream)
    }

    fn not_authorized() -> serde_json::Value {
        json!({ "success": false, "message": "Not Authorized. Login Again" })
    }

    fn invalid_token() -> serde_json::Value {
        json!({ "success": false, "message": "Invalid or expired token. Please login again." })
    }

    #[tokio::test]
    async fn test_cookie_token_attaches_principal() {
        let h = harness();
        let cookie = format!("token={}", sign("42"));
        let (status, body) = send(
            h.router,
            test_support::get("/whoami", &[("cookie", cookie.as_str())]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let principal = Principal {
            id: "42".to_string(),
            role: crate::api::v1::extractors::Role::Recruiter,
            email: "rita@example.com".to_string(),
            name: "Rita Recruiter".to_string(),
        };
        assert_eq!(body, serde_json::to_value(principal).unwrap());
        assert_eq!(h.downstream.load(Ordering::SeqCst), 1);
        assert_eq!(h.store.lookups(), 1);
    }

    #[tokio::test]
    async fn test_bearer_header_attaches_principal() {
        let h = harness();
        let auth = format!("Bearer {}", sign("7"));
        let (status, body) = send(
            h.router,
            test_support::get("/whoami", &[("authorization", auth.as_str())]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "seeker");
        assert_eq!(body["name"], "Sam Seeker");
        assert_eq!(h.downstream.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_numeric_id_claim_attaches_principal() {
        let h = harness();
        let exp = chrono::Utc::now().timestamp() + 600;
        let auth = format!(
            "Bearer {}",
            sign_with(SECRET, &json!({ "id": 42, "exp": exp }))
        );
        let (status, body) = send(
            h.router,
            test_support::get("/whoami", &[("authorization", auth.as_str())]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "42");
        assert_eq!(body["role"], "recruiter");
        assert_eq!(h.store.lookups(), 1);
    }

    #[tokio::test]
    async fn test_no_credential() {
        let h = harness();
        let (status, body) = send(h.router, test_support::get("/whoami", &[])).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, not_authorized());
        assert_eq!(h.downstream.load(Ordering::SeqCst), 0);
        assert_eq!(h.store.lookups(), 0);
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_missing_credential() {
        let h = harness();
        let (status, body) = send(
            h.router,
            test_support::get("/whoami", &[("authorization", "Basic xyz")]),
        )
        .await;

        // Missing-credential message, not the invalid-token one: verification never ran.
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, not_authorized());
        assert_eq!(h.store.lookups(), 0);
    }

    #[tokio::test]
    async fn test_tampered_token_skips_lookup() {
        let h = harness();
        let exp = chrono::Utc::now().timestamp() + 600;
        let forged = sign_with("attacker-secret", &json!({ "sub": "42", "exp": exp }));
        let auth = format!("Bearer {forged}");
        let (status, body) = send(
            h.router,
            test_support::get("/whoami", &[("authorization", auth.as_str())]),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, invalid_token());
        assert_eq!(h.store.lookups(), 0);
        assert_eq!(h.downstream.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expired_token_skips_lookup() {
        let h = harness();
        let exp = chrono::Utc::now().timestamp() - 600;
        let expired = sign_with(SECRET, &json!({ "sub": "42", "exp": exp }));
        let cookie = format!("token={expired}");
        let (status, body) = send(
            h.router,
            test_support::get("/whoami", &[("cookie", cookie.as_str())]),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, invalid_token());
        assert_eq!(h.store.lookups(), 0);
    }

    #[tokio::test]
    async fn test_unknown_user_is_404() {
        let h = harness();
        let auth = format!("Bearer {}", sign("999"));
        let (status, body) = send(
            h.router,
            test_support::get("/whoami", &[("authorization", auth.as_str())]),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "success": false, "message": "User not found" }));
        assert_eq!(h.downstream.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_user_concealed_as_401() {
        let mut config = auth_config();
        config.conceal_unknown_user = true;
        let (router, downstream) = router_with(state_with(&config, Arc::new(seeded_store())));
        let auth = format!("Bearer {}", sign("999"));
        let (status, body) = send(
            router,
            test_support::get("/whoami", &[("authorization", auth.as_str())]),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, invalid_token());
        assert_eq!(downstream.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_and_timeout_are_401() {
        let failing: Arc<dyn UserStore> = Arc::new(FailingUserStore);
        let (router, _) = router_with(state_with(&auth_config(), failing));
        let auth = format!("Bearer {}", sign("42"));
        let (status, body) = send(
            router,
            test_support::get("/whoami", &[("authorization", auth.as_str())]),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, invalid_token());

        let mut config = auth_config();
        config.user_lookup_timeout = Duration::from_millis(20);
        let slow: Arc<dyn UserStore> =
            Arc::new(SlowUserStore::new(seeded_store(), Duration::from_secs(5)));
        let (router, downstream) = router_with(state_with(&config, slow));
        let (status, body) = send(
            router,
            test_support::get("/whoami", &[("authorization", auth.as_str())]),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, invalid_token());
        assert_eq!(downstream.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_gated() {
        let h = harness();
        let (status, _) = send(h.router, test_support::get("/nope", &[])).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
