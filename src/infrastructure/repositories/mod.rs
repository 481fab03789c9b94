// src/infrastructure/repositories/mod.rs
mod clients;
mod error;
mod users;

pub use clients::{InMemoryClientRepository, PostgresClientRepository};
pub(crate) use error::map_sqlx;
pub use users::{InMemoryUserStore, PostgresUserRepository};
