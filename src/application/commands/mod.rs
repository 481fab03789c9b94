pub(crate) mod access;
pub mod auth;
pub mod clients;
pub mod users;
