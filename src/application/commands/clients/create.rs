use super::ClientCommandService;
use crate::{
    application::{
        commands::access::ensure_admin,
        dto::{AuthenticatedUser, ClientDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::client::{Client, ClientId, NewClient},
    domain::user::PasswordHash,
};

pub struct CreateClientCommand {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCommandService {
    pub async fn register(
        &self,
        actor: &AuthenticatedUser,
        command: CreateClientCommand,
    ) -> ApplicationResult<ClientDto> {
        ensure_admin(self.user_repo.as_ref(), actor).await?;
        let client = self.create_client(command).await?;

        tracing::info!(
            actor = %actor.username,
            client_id = %client.client_id,
            "client registered"
        );

        Ok(client.into())
    }

    /// Register a client without an acting admin. Used by startup seeding.
    pub async fn create_client(&self, command: CreateClientCommand) -> ApplicationResult<Client> {
        let client_id = ClientId::new(command.client_id)?;
        if command.client_secret.is_empty() {
            return Err(ApplicationError::missing_field("clientSecret"));
        }

        if self
            .client_repo
            .find_by_client_id(&client_id)
            .await?
            .is_some()
        {
            return Err(ApplicationError::conflict("client already exists"));
        }

        let hashed = self.password_hasher.hash(&command.client_secret).await?;
        let new_client = NewClient::new(client_id, PasswordHash::new(hashed)?, self.clock.now());

        Ok(self.client_repo.insert(new_client).await?)
    }
}
