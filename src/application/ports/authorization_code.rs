// src/application/ports/authorization_code.rs
use crate::application::ApplicationResult;
use crate::domain::user::{ClientId, Username};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationCode {
    pub code: String,
    pub username: String,
    pub client_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthorizationCode {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Short-lived, single-use mapping from an opaque code to the identity that
/// requested it.
#[async_trait]
pub trait AuthorizationCodeStore: Send + Sync {
    /// Generate, store and return a fresh random code bound to (username, client_id).
    async fn issue(&self, username: &Username, client_id: &ClientId)
    -> ApplicationResult<AuthorizationCode>;

    /// Atomically remove the code and return it when it exists, is unexpired and
    /// was issued to `client_id`. A code presented by another client is left in place.
    async fn consume(
        &self,
        code: &str,
        client_id: &ClientId,
    ) -> ApplicationResult<Option<AuthorizationCode>>;

    /// Drop expired entries, returning how many were removed.
    async fn purge_expired(&self) -> ApplicationResult<usize>;
}
