/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (認証/認可), cors, http (request-id/trace/timeout) を束ねる
 */
pub mod auth;
pub mod cors;
pub mod http;
