use crate::domain::errors::DomainResult;
use crate::domain::user::{
    entity::{NewUser, TokenRecord, User},
    value_objects::{ClientId, TokenKind, Username},
};
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn count(&self) -> DomainResult<u64>;

    async fn insert(&self, new_user: NewUser) -> DomainResult<User>;

    async fn find_by_username(&self, username: &Username) -> DomainResult<Option<User>>;
}

/// Durable record of the token pair each user holds per client. This is the
/// authority for revocation: a signed token is only honoured while it equals
/// the value stored here.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Create or fully overwrite the record for (username, client_id).
    async fn upsert(
        &self,
        username: &Username,
        client_id: &ClientId,
        record: TokenRecord,
    ) -> DomainResult<()>;

    /// True only if `token` equals the stored value of `kind` for the pair.
    async fn verify(
        &self,
        username: &Username,
        client_id: &ClientId,
        token: &str,
        kind: TokenKind,
    ) -> DomainResult<bool>;

    /// Compare-and-swap on the refresh token. Returns false when the stored
    /// refresh token no longer equals `presented_refresh` (or no record exists).
    async fn rotate(
        &self,
        username: &Username,
        client_id: &ClientId,
        presented_refresh: &str,
        record: TokenRecord,
    ) -> DomainResult<bool>;

    /// Idempotent.
    async fn remove(&self, username: &Username, client_id: &ClientId) -> DomainResult<()>;
}
