// src/domain/user/mod.rs
pub mod entity;
pub mod repository;
pub mod value_objects;

pub use entity::{NewUser, TokenRecord, User};
pub use repository::{TokenRepository, UserRepository};
pub use value_objects::{ClientId, DisplayName, PasswordHash, TokenKind, Username};
