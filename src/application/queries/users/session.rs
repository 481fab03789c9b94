use super::UserQueryService;
use crate::application::{
    dto::{AuthenticatedUser, SessionDto},
    error::{ApplicationResult, AuthError},
};

impl UserQueryService {
    /// Describe the session behind an authenticated request.
    pub async fn current_session(&self, actor: &AuthenticatedUser) -> ApplicationResult<SessionDto> {
        let user = self
            .user_repo
            .find_by_username(&actor.username)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        Ok(SessionDto::from_parts(&user, actor))
    }
}
