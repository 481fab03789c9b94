use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::application::{
    ApplicationResult,
    error::{ApplicationError, AuthError},
    ports::security::PasswordHasher,
};
use crate::domain::user::{User, UserRepository, Username};

const DUMMY_PASSWORD: &str = "authgate-dummy-password";

/// Verifies a username/password pair against the stored hash.
pub struct CredentialVerifier {
    user_repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    dummy_hash: OnceCell<String>,
}

impl CredentialVerifier {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
            dummy_hash: OnceCell::new(),
        }
    }

    pub async fn verify(&self, username: &str, password: &str) -> ApplicationResult<User> {
        let user = match Username::new(username) {
            Ok(username) => self.user_repo.find_by_username(&username).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            // Pay for one hash verification so a miss costs the same as a bad password.
            self.burn_verification(password).await?;
            return Err(AuthError::UserNotFound.into());
        };

        self.password_hasher
            .verify(password, user.password_hash.as_str())
            .await
            .map_err(|err| match err {
                ApplicationError::Auth(_) => ApplicationError::from(AuthError::InvalidPassword),
                other => other,
            })?;

        if !user.is_active {
            return Err(AuthError::AccountDisabled.into());
        }

        Ok(user)
    }

    async fn burn_verification(&self, password: &str) -> ApplicationResult<()> {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.password_hasher.hash(DUMMY_PASSWORD))
            .await?;
        let _ = self.password_hasher.verify(password, dummy).await;
        Ok(())
    }
}
