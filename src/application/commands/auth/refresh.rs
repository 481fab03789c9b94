use super::AuthCommandService;
use crate::application::{ApplicationResult, dto::TokenPairDto, error::AuthError};
use crate::domain::user::TokenKind;

pub struct RefreshTokenCommand {
    pub refresh_token: String,
}

impl AuthCommandService {
    /// Rotate both tokens. The presented refresh token must still be the one on
    /// record; anything older is treated as a replay.
    pub async fn refresh(&self, command: RefreshTokenCommand) -> ApplicationResult<TokenPairDto> {
        let claims = self
            .decode_token(&command.refresh_token, TokenKind::Refresh)
            .await?;
        let subject = claims.subject();

        let current = self
            .token_repo
            .verify(
                &subject.username,
                &subject.client_id,
                &command.refresh_token,
                TokenKind::Refresh,
            )
            .await?;
        if !current {
            tracing::warn!(
                username = %subject.username,
                client_id = %subject.client_id,
                "superseded refresh token presented"
            );
            return Err(AuthError::TokenReuse.into());
        }

        let (pair, record) = self.issue_token_pair(&subject).await?;

        // A concurrent refresh with the same token may have won between verify and here.
        let rotated = self
            .token_repo
            .rotate(
                &subject.username,
                &subject.client_id,
                &command.refresh_token,
                record,
            )
            .await?;
        if !rotated {
            tracing::warn!(
                username = %subject.username,
                client_id = %subject.client_id,
                "refresh token lost rotation race"
            );
            return Err(AuthError::TokenReuse.into());
        }

        tracing::info!(
            username = %subject.username,
            client_id = %subject.client_id,
            "token pair rotated"
        );

        Ok(pair)
    }
}
