pub mod endpoints;
pub mod health;
pub mod me;
