use std::sync::Arc;

use crate::application::{
    ApplicationResult,
    dto::{TokenPairDto, TokenSubject},
    ports::{
        authorization_code::AuthorizationCodeStore,
        security::{PasswordHasher, TokenCodec},
        time::Clock,
    },
};
use crate::domain::{
    client::ClientRepository,
    user::{TokenRecord, TokenRepository, UserRepository},
};

use super::{ClientRegistry, CredentialVerifier};

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthPolicy {
    /// Reject code exchanges that omit `clientSecret`.
    pub require_client_secret: bool,
}

/// Orchestrates the authorization-code grant: authorize, exchange, refresh,
/// logout, plus the per-request access token check.
pub struct AuthCommandService {
    pub(super) clients: ClientRegistry,
    pub(super) credentials: CredentialVerifier,
    pub(super) code_store: Arc<dyn AuthorizationCodeStore>,
    pub(super) token_codec: Arc<dyn TokenCodec>,
    pub(super) token_repo: Arc<dyn TokenRepository>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) policy: AuthPolicy,
}

impl AuthCommandService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        client_repo: Arc<dyn ClientRepository>,
        token_repo: Arc<dyn TokenRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_codec: Arc<dyn TokenCodec>,
        code_store: Arc<dyn AuthorizationCodeStore>,
        clock: Arc<dyn Clock>,
        policy: AuthPolicy,
    ) -> Self {
        Self {
            clients: ClientRegistry::new(client_repo, Arc::clone(&password_hasher)),
            credentials: CredentialVerifier::new(user_repo, password_hasher),
            code_store,
            token_codec,
            token_repo,
            clock,
            policy,
        }
    }

    pub(super) async fn issue_token_pair(
        &self,
        subject: &TokenSubject,
    ) -> ApplicationResult<(TokenPairDto, TokenRecord)> {
        let access_token = self.token_codec.issue_access_token(subject).await?;
        let refresh_token = self.token_codec.issue_refresh_token(subject).await?;
        let record = TokenRecord::new(
            access_token.clone(),
            refresh_token.clone(),
            self.clock.now(),
        );

        Ok((
            TokenPairDto {
                access_token,
                refresh_token,
            },
            record,
        ))
    }
}
