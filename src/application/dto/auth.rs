use crate::domain::user::{ClientId, TokenKind, Username};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub username: Username,
    pub client_id: ClientId,
}

impl TokenSubject {
    pub fn new(username: Username, client_id: ClientId) -> Self {
        Self {
            username,
            client_id,
        }
    }
}

/// Claims recovered from a token whose signature and expiry checked out.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub username: Username,
    pub client_id: ClientId,
    pub kind: TokenKind,
    pub token_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenClaims {
    pub fn subject(&self) -> TokenSubject {
        TokenSubject::new(self.username.clone(), self.client_id.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorizationCodeDto {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairDto {
    pub access_token: String,
    pub refresh_token: String,
}

/// Identity attached to a request after `authenticate_request` succeeded.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: Username,
    pub client_id: ClientId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            username: claims.username,
            client_id: claims.client_id,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub username: String,
    pub client_id: String,
    pub is_admin: bool,
    pub expires_at: DateTime<Utc>,
}

impl SessionDto {
    pub fn from_parts(user: &crate::domain::user::User, actor: &AuthenticatedUser) -> Self {
        Self {
            username: user.username.to_string(),
            client_id: actor.client_id.to_string(),
            is_admin: user.is_admin,
            expires_at: actor.expires_at,
        }
    }
}
