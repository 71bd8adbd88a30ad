/*
 * Responsibility
 * - 認証済み主体を返す handler
 * - /auth/me は認証のみ、/recruiter/me・/seeker/me は role gate の後ろに置く
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::{Principal, PrincipalExtractor};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: Principal,
}

pub async fn me(PrincipalExtractor(principal): PrincipalExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        success: true,
        user: principal,
    })
}
