// src/domain/client/mod.rs
pub mod entity;
pub mod repository;

pub use crate::domain::user::value_objects::ClientId;
pub use entity::{Client, NewClient};
pub use repository::ClientRepository;
