// src/presentation/http/middleware/mod.rs
pub mod rate_limit;
pub mod require_authenticated;

pub use rate_limit::rate_limit_layer;
pub use require_authenticated::require_authenticated;
