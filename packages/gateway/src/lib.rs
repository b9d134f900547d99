// Agency Platform - Dashboard API Gateway
//
// Presents a same-origin API surface to the dashboard and forwards every call
// to the separately deployed backend, injecting the caller's identity after
// the session has been validated.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
