// src/domain/user/entity.rs
use crate::domain::user::value_objects::{
    ClientId, DisplayName, PasswordHash, TokenKind, Username,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// The token pair currently valid for one (user, client) session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub updated_at: DateTime<Utc>,
}

impl TokenRecord {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            updated_at,
        }
    }

    pub fn token(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.access_token,
            TokenKind::Refresh => &self.refresh_token,
        }
    }

    pub fn matches(&self, kind: TokenKind, token: &str) -> bool {
        self.token(kind) == token
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub username: Username,
    pub display_name: DisplayName,
    pub password_hash: PasswordHash,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub tokens: BTreeMap<ClientId, TokenRecord>,
}

impl User {
    pub fn token_for(&self, client_id: &ClientId) -> Option<&TokenRecord> {
        self.tokens.get(client_id)
    }

    /// Replace the record for `client_id` wholesale.
    pub fn upsert_token(&mut self, client_id: ClientId, record: TokenRecord) {
        self.tokens.insert(client_id, record);
    }

    /// Replace the record only while its refresh token still equals `presented_refresh`.
    pub fn rotate_token(
        &mut self,
        client_id: &ClientId,
        presented_refresh: &str,
        record: TokenRecord,
    ) -> bool {
        match self.tokens.get_mut(client_id) {
            Some(current) if current.matches(TokenKind::Refresh, presented_refresh) => {
                *current = record;
                true
            }
            _ => false,
        }
    }

    pub fn remove_token(&mut self, client_id: &ClientId) -> Option<TokenRecord> {
        self.tokens.remove(client_id)
    }

    pub fn active_clients(&self) -> impl Iterator<Item = &ClientId> {
        self.tokens.keys()
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub display_name: DisplayName,
    pub password_hash: PasswordHash,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(
        username: Username,
        display_name: DisplayName,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username,
            display_name,
            password_hash,
            is_admin: false,
            is_active: true,
            created_at,
        }
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn into_user(self) -> User {
        User {
            username: self.username,
            display_name: self.display_name,
            password_hash: self.password_hash,
            is_admin: self.is_admin,
            is_active: self.is_active,
            created_at: self.created_at,
            tokens: BTreeMap::new(),
        }
    }
}
