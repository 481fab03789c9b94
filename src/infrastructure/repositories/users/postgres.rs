// src/infrastructure/repositories/users/postgres.rs
use super::super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::{
    ClientId, DisplayName, NewUser, PasswordHash, TokenKind, TokenRecord, TokenRepository, User,
    UserRepository, Username,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::BTreeMap;

/// Users and their per-client token records. One pool backs both traits so the
/// token table can reference `users` by foreign key.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_tokens(&self, username: &str) -> DomainResult<BTreeMap<ClientId, TokenRecord>> {
        let rows = sqlx::query_as::<_, TokenRow>(
            "SELECT client_id, access_token, refresh_token, updated_at
             FROM user_tokens WHERE username = $1",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter()
            .map(|row| {
                let client_id = ClientId::new(row.client_id)?;
                let record = TokenRecord::new(row.access_token, row.refresh_token, row.updated_at);
                Ok((client_id, record))
            })
            .collect()
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    username: String,
    display_name: String,
    password_hash: String,
    is_admin: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct TokenRow {
    client_id: String,
    access_token: String,
    refresh_token: String,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, tokens: BTreeMap<ClientId, TokenRecord>) -> Result<User, DomainError> {
        Ok(User {
            username: Username::new(self.username)?,
            display_name: DisplayName::new(self.display_name)?,
            password_hash: PasswordHash::new(self.password_hash)?,
            is_admin: self.is_admin,
            is_active: self.is_active,
            created_at: self.created_at,
            tokens,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn count(&self) -> DomainResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM users")
            .fetch_one(&self.pool)
            .await
            .map(|count| count as u64)
            .map_err(map_sqlx)
    }

    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let NewUser {
            username,
            display_name,
            password_hash,
            is_admin,
            is_active,
            created_at,
        } = new_user;

        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username, display_name, password_hash, is_admin, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING username, display_name, password_hash, is_admin, is_active, created_at",
        )
        .bind(username.as_str())
        .bind(display_name.as_str())
        .bind(password_hash.as_str())
        .bind(is_admin)
        .bind(is_active)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.into_user(BTreeMap::new())
    }

    async fn find_by_username(&self, username: &Username) -> DomainResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT username, display_name, password_hash, is_admin, is_active, created_at
             FROM users WHERE username = $1",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        match row {
            Some(row) => {
                let tokens = self.load_tokens(username.as_str()).await?;
                row.into_user(tokens).map(Some)
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TokenRepository for PostgresUserRepository {
    async fn upsert(
        &self,
        username: &Username,
        client_id: &ClientId,
        record: TokenRecord,
    ) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO user_tokens (username, client_id, access_token, refresh_token, updated_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (username, client_id) DO UPDATE
             SET access_token = EXCLUDED.access_token,
                 refresh_token = EXCLUDED.refresh_token,
                 updated_at = EXCLUDED.updated_at",
        )
        .bind(username.as_str())
        .bind(client_id.as_str())
        .bind(&record.access_token)
        .bind(&record.refresh_token)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(())
    }

    async fn verify(
        &self,
        username: &Username,
        client_id: &ClientId,
        token: &str,
        kind: TokenKind,
    ) -> DomainResult<bool> {
        let sql = match kind {
            TokenKind::Access => {
                "SELECT EXISTS (SELECT 1 FROM user_tokens
                 WHERE username = $1 AND client_id = $2 AND access_token = $3)"
            }
            TokenKind::Refresh => {
                "SELECT EXISTS (SELECT 1 FROM user_tokens
                 WHERE username = $1 AND client_id = $2 AND refresh_token = $3)"
            }
        };

        sqlx::query_scalar::<_, bool>(sql)
            .bind(username.as_str())
            .bind(client_id.as_str())
            .bind(token)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn rotate(
        &self,
        username: &Username,
        client_id: &ClientId,
        presented_refresh: &str,
        record: TokenRecord,
    ) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE user_tokens
             SET access_token = $4, refresh_token = $5, updated_at = $6
             WHERE username = $1 AND client_id = $2 AND refresh_token = $3",
        )
        .bind(username.as_str())
        .bind(client_id.as_str())
        .bind(presented_refresh)
        .bind(&record.access_token)
        .bind(&record.refresh_token)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove(&self, username: &Username, client_id: &ClientId) -> DomainResult<()> {
        sqlx::query("DELETE FROM user_tokens WHERE username = $1 AND client_id = $2")
            .bind(username.as_str())
            .bind(client_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }
}
