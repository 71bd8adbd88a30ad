/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON `{ success, message }` body)
 * - 認証・認可の失敗はここで一度だけ response に変換され、handler には到達しない
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::api::v1::extractors::Role;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// No credential in cookie or `Authorization` header.
    #[error("Not Authorized. Login Again")]
    MissingCredential,
    /// Verification failed, or the user lookup failed / timed out.
    #[error("Invalid or expired token. Please login again.")]
    InvalidCredential,
    #[error("User not found")]
    UserNotFound,
    /// Role gate reached without a Principal in the request.
    #[error("Authentication required")]
    AuthenticationRequired,
    #[error("Access denied. Only {required}s can perform this action.")]
    Forbidden { required: Role, found: Role },
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCredential
            | AppError::InvalidCredential
            | AppError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            success: false,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
