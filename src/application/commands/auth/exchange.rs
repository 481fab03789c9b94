use super::AuthCommandService;
use crate::application::{
    ApplicationResult,
    dto::{TokenPairDto, TokenSubject},
    error::{ApplicationError, AuthError},
};
use crate::domain::user::Username;

pub struct ExchangeCodeCommand {
    pub client_id: String,
    pub code: String,
    pub client_secret: Option<String>,
}

impl AuthCommandService {
    /// Trade an authorization code for a fresh access/refresh pair. Once
    /// consumed, the code stays spent even if token issuance fails afterwards.
    pub async fn exchange(&self, command: ExchangeCodeCommand) -> ApplicationResult<TokenPairDto> {
        if self.policy.require_client_secret && command.client_secret.is_none() {
            return Err(ApplicationError::missing_field("clientSecret"));
        }

        let client = self
            .clients
            .validate(&command.client_id, command.client_secret.as_deref())
            .await?;

        let code = self
            .code_store
            .consume(&command.code, &client.client_id)
            .await?
            .ok_or(AuthError::InvalidCode)?;

        let username = Username::new(code.username).map_err(|_| AuthError::InvalidCode)?;
        let subject = TokenSubject::new(username, client.client_id);

        let (pair, record) = self.issue_token_pair(&subject).await?;
        self.token_repo
            .upsert(&subject.username, &subject.client_id, record)
            .await?;

        tracing::info!(
            username = %subject.username,
            client_id = %subject.client_id,
            "authorization code exchanged"
        );

        Ok(pair)
    }
}
