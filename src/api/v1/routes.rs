/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - public: /health, /endpoints
 * - 認証必須: /auth/me
 * - 認証 + role: /recruiter/me, /seeker/me
 *
 * Layer の順序: role gate を先に route_layer し、その外側に access middleware を掛ける
 * (外側が先に走るので、role gate は常に Principal が付いた後に評価される)
 */
use axum::{Router, routing::get};

use crate::api::v1::extractors::Role;
use crate::api::v1::handlers::{endpoints::endpoints, health::health, me::me};
use crate::middleware::auth::{access, role};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let recruiter = role::apply(
        Router::new().route("/recruiter/me", get(me)),
        Role::Recruiter,
    );
    let seeker = role::apply(Router::new().route("/seeker/me", get(me)), Role::Seeker);

    let protected = Router::new()
        .route("/auth/me", get(me))
        .merge(recruiter)
        .merge(seeker);
    let protected = access::apply(protected, state);

    Router::new()
        .route("/health", get(health))
        .route("/endpoints", get(endpoints))
        .merge(protected)
}
