/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: Authenticator (secret と user store を内包), endpoints: frontend 向け URL map
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - request ごとの状態 (Principal) はここに置かず request extensions に載せる
 */
use std::sync::Arc;

use crate::frontend::ApiEndpoints;
use crate::services::auth::Authenticator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<Authenticator>,
    pub endpoints: Arc<ApiEndpoints>,
}

impl AppState {
    pub fn new(auth: Arc<Authenticator>, endpoints: ApiEndpoints) -> Self {
        Self {
            auth,
            endpoints: Arc::new(endpoints),
        }
    }
}
