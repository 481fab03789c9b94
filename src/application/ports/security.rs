// src/application/ports/security.rs
use crate::application::{
    ApplicationResult,
    dto::{TokenClaims, TokenSubject},
};
use crate::domain::user::TokenKind;
use async_trait::async_trait;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> ApplicationResult<String>;
    /// Constant-time check of `password` against a stored hash. A mismatch is
    /// reported as `AuthError::InvalidPassword`.
    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()>;
}

/// Creates and verifies signed tokens. Knows nothing about revocation.
#[async_trait]
pub trait TokenCodec: Send + Sync {
    async fn issue(&self, subject: &TokenSubject, kind: TokenKind) -> ApplicationResult<String>;

    /// Check signature and expiry only. Failures are `AuthError::InvalidToken`.
    async fn verify(&self, token: &str) -> ApplicationResult<TokenClaims>;

    async fn issue_access_token(&self, subject: &TokenSubject) -> ApplicationResult<String> {
        self.issue(subject, TokenKind::Access).await
    }

    async fn issue_refresh_token(&self, subject: &TokenSubject) -> ApplicationResult<String> {
        self.issue(subject, TokenKind::Refresh).await
    }
}
