// src/application/ports/mod.rs
pub mod authorization_code;
pub mod security;
pub mod time;

// Type aliases to make port injection sites more descriptive and reduce `dyn` noise
pub type PasswordHasherPort = dyn security::PasswordHasher;
pub type TokenCodecPort = dyn security::TokenCodec;
pub type AuthorizationCodeStorePort = dyn authorization_code::AuthorizationCodeStore;
pub type ClockPort = dyn time::Clock;
