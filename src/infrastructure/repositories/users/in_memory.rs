// src/infrastructure/repositories/users/in_memory.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::{
    ClientId, NewUser, TokenKind, TokenRecord, TokenRepository, User, UserRepository, Username,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Process-local user aggregates. Every operation runs under one lock, which
/// makes `rotate` a true compare-and-swap.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<BTreeMap<Username, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> DomainResult<MutexGuard<'_, BTreeMap<Username, User>>> {
        self.users
            .lock()
            .map_err(|_| DomainError::Persistence("user store poisoned".into()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn count(&self) -> DomainResult<u64> {
        Ok(self.lock()?.len() as u64)
    }

    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let mut users = self.lock()?;
        if users.contains_key(&new_user.username) {
            return Err(DomainError::Conflict("username already exists".into()));
        }
        let user = new_user.into_user();
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> DomainResult<Option<User>> {
        Ok(self.lock()?.get(username).cloned())
    }
}

#[async_trait]
impl TokenRepository for InMemoryUserStore {
    async fn upsert(
        &self,
        username: &Username,
        client_id: &ClientId,
        record: TokenRecord,
    ) -> DomainResult<()> {
        let mut users = self.lock()?;
        let user = users
            .get_mut(username)
            .ok_or_else(|| DomainError::NotFound("user not found".into()))?;
        user.upsert_token(client_id.clone(), record);
        Ok(())
    }

    async fn verify(
        &self,
        username: &Username,
        client_id: &ClientId,
        token: &str,
        kind: TokenKind,
    ) -> DomainResult<bool> {
        let users = self.lock()?;
        Ok(users
            .get(username)
            .and_then(|user| user.token_for(client_id))
            .is_some_and(|record| record.matches(kind, token)))
    }

    async fn rotate(
        &self,
        username: &Username,
        client_id: &ClientId,
        presented_refresh: &str,
        record: TokenRecord,
    ) -> DomainResult<bool> {
        let mut users = self.lock()?;
        Ok(users
            .get_mut(username)
            .is_some_and(|user| user.rotate_token(client_id, presented_refresh, record)))
    }

    async fn remove(&self, username: &Username, client_id: &ClientId) -> DomainResult<()> {
        let mut users = self.lock()?;
        if let Some(user) = users.get_mut(username) {
            user.remove_token(client_id);
        }
        Ok(())
    }
}
