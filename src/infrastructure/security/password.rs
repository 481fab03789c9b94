use crate::application::{
    error::{ApplicationError, ApplicationResult, AuthError},
    ports::security::PasswordHasher,
};
use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use async_trait::async_trait;

/// Argon2id with per-hash random salts. Verification is constant-time and
/// runs on the blocking pool.
#[derive(Default, Clone)]
pub struct Argon2PasswordHasher;

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))
        })
        .await
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()> {
        let password = password.to_owned();
        let expected_hash = expected_hash.to_owned();
        tokio::task::spawn_blocking(move || -> Result<(), ApplicationError> {
            let parsed = PasswordHash::new(&expected_hash)
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .map_err(|_| ApplicationError::from(AuthError::InvalidPassword))
        })
        .await
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify_accepts_only_the_original_password() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash("87654321").await.unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("87654321", &hash).await.is_ok());

        let err = hasher.verify("WrongPassword", &hash).await.unwrap_err();
        assert_eq!(err.auth_kind(), Some(AuthError::InvalidPassword));
    }

    #[tokio::test]
    async fn malformed_hash_is_an_infrastructure_error() {
        let err = Argon2PasswordHasher
            .verify("pw", "not-a-phc-string")
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Infrastructure(_)));
    }
}
