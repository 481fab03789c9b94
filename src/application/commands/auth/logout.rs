use super::AuthCommandService;
use crate::application::ApplicationResult;
use crate::domain::user::TokenKind;

pub struct LogoutCommand {
    pub access_token: String,
}

impl AuthCommandService {
    /// Delete the session record, revoking both tokens of the pair.
    pub async fn logout(&self, command: LogoutCommand) -> ApplicationResult<()> {
        let claims = self
            .verify_stored_token(&command.access_token, TokenKind::Access)
            .await?;

        self.token_repo
            .remove(&claims.username, &claims.client_id)
            .await?;

        tracing::info!(
            username = %claims.username,
            client_id = %claims.client_id,
            "session logged out"
        );

        Ok(())
    }
}
