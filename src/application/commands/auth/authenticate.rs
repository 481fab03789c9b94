use super::AuthCommandService;
use crate::application::{
    ApplicationResult,
    dto::{AuthenticatedUser, TokenClaims},
    error::{ApplicationError, AuthError},
};
use crate::domain::user::TokenKind;

impl AuthCommandService {
    /// Gate for every protected route: the access token must verify and still
    /// be the one on record for its (user, client) pair.
    pub async fn authenticate_request(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        match self.verify_stored_token(token, TokenKind::Access).await {
            Ok(claims) => Ok(AuthenticatedUser::from(claims)),
            Err(ApplicationError::Auth(_)) => Err(AuthError::Unauthorized.into()),
            Err(other) => Err(other),
        }
    }

    /// Signature, expiry and kind check. Every failure is `InvalidToken`.
    pub(super) async fn decode_token(
        &self,
        token: &str,
        kind: TokenKind,
    ) -> ApplicationResult<TokenClaims> {
        let claims = self.token_codec.verify(token).await.map_err(|err| match err {
            ApplicationError::Auth(_) => ApplicationError::from(AuthError::InvalidToken),
            other => other,
        })?;

        if claims.kind != kind {
            return Err(AuthError::InvalidToken.into());
        }

        Ok(claims)
    }

    /// `decode_token` followed by the revocation lookup.
    pub(super) async fn verify_stored_token(
        &self,
        token: &str,
        kind: TokenKind,
    ) -> ApplicationResult<TokenClaims> {
        let claims = self.decode_token(token, kind).await?;

        let current = self
            .token_repo
            .verify(&claims.username, &claims.client_id, token, kind)
            .await?;
        if !current {
            return Err(AuthError::InvalidToken.into());
        }

        Ok(claims)
    }
}
