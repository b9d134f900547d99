// Shared primitives used across domains

pub mod headers;
pub mod user_id;

pub use headers::*;
pub use user_id::*;
