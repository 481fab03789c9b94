use std::sync::Arc;

use crate::application::ports::{security::PasswordHasher, time::Clock};
use crate::domain::{client::ClientRepository, user::UserRepository};

pub struct ClientCommandService {
    pub(super) client_repo: Arc<dyn ClientRepository>,
    pub(super) user_repo: Arc<dyn UserRepository>,
    pub(super) password_hasher: Arc<dyn PasswordHasher>,
    pub(super) clock: Arc<dyn Clock>,
}

impl ClientCommandService {
    pub fn new(
        client_repo: Arc<dyn ClientRepository>,
        user_repo: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client_repo,
            user_repo,
            password_hasher,
            clock,
        }
    }
}
