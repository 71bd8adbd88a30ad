/*
 * Responsibility
 * - 認証 (credential 抽出 → 検証 → Principal 付与) と認可 (role gate) の middleware
 */
pub mod access;
pub mod credential;
pub mod role;
