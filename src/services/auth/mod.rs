pub mod authenticator;
pub mod factory;
pub mod token;

pub use authenticator::{AuthError, Authenticator};
pub use factory::{build_authenticator, build_user_store};
