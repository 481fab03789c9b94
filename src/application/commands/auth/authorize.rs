use super::AuthCommandService;
use crate::application::{ApplicationResult, dto::AuthorizationCodeDto};

pub struct AuthorizeCommand {
    pub username: String,
    pub password: String,
    pub client_id: String,
}

impl AuthCommandService {
    /// Validate the client and the user's credentials, then hand out a
    /// single-use authorization code bound to both.
    pub async fn authorize(
        &self,
        command: AuthorizeCommand,
    ) -> ApplicationResult<AuthorizationCodeDto> {
        let client = self.clients.validate(&command.client_id, None).await?;

        let user = match self
            .credentials
            .verify(&command.username, &command.password)
            .await
        {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(
                    client_id = %client.client_id,
                    error = %err,
                    "authorization rejected"
                );
                return Err(err);
            }
        };

        let code = self
            .code_store
            .issue(&user.username, &client.client_id)
            .await?;

        tracing::info!(
            username = %user.username,
            client_id = %client.client_id,
            "authorization code issued"
        );

        Ok(AuthorizationCodeDto { code: code.code })
    }
}
