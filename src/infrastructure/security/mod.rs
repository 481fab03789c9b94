// src/infrastructure/security/mod.rs
pub mod authorization_code_store;
pub mod claims;
pub mod password;
pub mod redis_authorization_code_store;
pub mod token;
