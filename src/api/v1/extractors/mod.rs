/*
 * Responsibility
 * - handler が受け取る extractor 群の公開窓口
 */
mod principal;

pub use principal::{Principal, PrincipalExtractor, Role};
