/*
 * Responsibility
 * - GET /endpoints: frontend が使う API URL map を返す (public)
 * - `?email=` があれば email 依存の 2 entry も埋めて返す
 */
use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{frontend::ApiEndpoints, state::AppState};

#[derive(Debug, Deserialize)]
pub struct EndpointsQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointsResponse {
    #[serde(flatten)]
    pub endpoints: ApiEndpoints,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resend_otp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_by_email: Option<String>,
}

pub async fn endpoints(
    State(state): State<AppState>,
    Query(query): Query<EndpointsQuery>,
) -> Json<EndpointsResponse> {
    let email = query.email.filter(|e| !e.trim().is_empty());

    Json(EndpointsResponse {
        resend_otp: email.as_deref().map(|e| state.endpoints.resend_otp(e)),
        user_by_email: email.as_deref().map(|e| state.endpoints.user_by_email(e)),
        endpoints: state.endpoints.as_ref().clone(),
    })
}
