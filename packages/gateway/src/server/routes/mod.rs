// HTTP routes
pub mod backend;
pub mod health;

pub use backend::*;
pub use health::*;
