use crate::application::{
    dto::AuthenticatedUser,
    error::{ApplicationError, ApplicationResult},
};
use crate::domain::user::{User, UserRepository};

/// Load the acting user and require the admin flag.
pub(crate) async fn ensure_admin(
    user_repo: &dyn UserRepository,
    actor: &AuthenticatedUser,
) -> ApplicationResult<User> {
    let user = user_repo
        .find_by_username(&actor.username)
        .await?
        .ok_or_else(|| ApplicationError::forbidden("administrative privileges are required"))?;

    if !user.is_admin || !user.is_active {
        return Err(ApplicationError::forbidden(
            "administrative privileges are required",
        ));
    }

    Ok(user)
}
