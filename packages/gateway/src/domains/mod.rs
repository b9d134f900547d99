pub mod auth;
pub mod proxy;
