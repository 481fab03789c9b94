use std::sync::Arc;

use crate::application::{
    ApplicationResult,
    error::{ApplicationError, AuthError},
    ports::security::PasswordHasher,
};
use crate::domain::client::{Client, ClientId, ClientRepository};

/// Checks that a presented client identifier (and optionally its secret)
/// belongs to a registered client. Read-only.
pub struct ClientRegistry {
    client_repo: Arc<dyn ClientRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl ClientRegistry {
    pub fn new(
        client_repo: Arc<dyn ClientRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            client_repo,
            password_hasher,
        }
    }

    pub async fn validate(
        &self,
        client_id: &str,
        client_secret: Option<&str>,
    ) -> ApplicationResult<Client> {
        let client_id = ClientId::new(client_id).map_err(|_| AuthError::InvalidClient)?;
        let client = self
            .client_repo
            .find_by_client_id(&client_id)
            .await?
            .ok_or(AuthError::InvalidClient)?;

        if let Some(secret) = client_secret {
            self.password_hasher
                .verify(secret, client.secret_hash.as_str())
                .await
                .map_err(|err| match err {
                    ApplicationError::Auth(_) => ApplicationError::from(AuthError::InvalidClient),
                    other => other,
                })?;
        }

        Ok(client)
    }
}
