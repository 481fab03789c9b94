use super::{UserCommandService, password::validate_password};
use crate::{
    application::{
        commands::access::ensure_admin,
        dto::{AuthenticatedUser, UserDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::user::{DisplayName, NewUser, PasswordHash, User, Username},
};

pub struct RegisterUserCommand {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub is_admin: bool,
    pub is_active: bool,
}

impl UserCommandService {
    /// Admin-only registration of a new user.
    pub async fn register(
        &self,
        actor: &AuthenticatedUser,
        command: RegisterUserCommand,
    ) -> ApplicationResult<UserDto> {
        ensure_admin(self.user_repo.as_ref(), actor).await?;
        let user = self.create_user(command).await?;

        tracing::info!(
            actor = %actor.username,
            username = %user.username,
            is_admin = user.is_admin,
            "user registered"
        );

        Ok(user.into())
    }

    /// Create a user without an acting admin. Used by startup seeding.
    pub async fn create_user(&self, command: RegisterUserCommand) -> ApplicationResult<User> {
        let username = Username::new(command.username)?;
        let display_name = DisplayName::new(command.display_name)?;
        validate_password(&command.password)?;

        if self.user_repo.find_by_username(&username).await?.is_some() {
            return Err(ApplicationError::conflict("username already exists"));
        }

        let hashed = self.password_hasher.hash(&command.password).await?;
        let password_hash = PasswordHash::new(hashed)?;

        let new_user = NewUser::new(username, display_name, password_hash, self.clock.now())
            .with_admin(command.is_admin)
            .with_active(command.is_active);

        Ok(self.user_repo.insert(new_user).await?)
    }
}
