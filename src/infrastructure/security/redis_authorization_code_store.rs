// src/infrastructure/security/redis_authorization_code_store.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    authorization_code::{AuthorizationCode, AuthorizationCodeStore},
    time::Clock,
};
use crate::domain::user::{ClientId, Username};
use crate::infrastructure::security::authorization_code_store::{expiry_window, generate_code};
use async_trait::async_trait;
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};
use std::sync::Arc;
use std::time::Duration;

/// Codes live under `auth_code:{client_id}:{code}` so a lookup by another
/// client never touches the entry. Expiry is delegated to Redis via `EX`.
#[derive(Clone)]
pub struct RedisAuthorizationCodeStore {
    pool: Pool,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

fn key_for(client_id: &str, code: &str) -> String {
    format!("auth_code:{}:{}", client_id, code)
}

fn redis_err<E: std::fmt::Display>(err: E) -> ApplicationError {
    ApplicationError::infrastructure(err.to_string())
}

impl RedisAuthorizationCodeStore {
    /// Create a store from a redis URL (e.g. redis://:password@host:6379/0)
    pub fn from_url(url: &str, clock: Arc<dyn Clock>, ttl: Duration) -> ApplicationResult<Self> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(redis_err)?;

        Ok(Self { pool, clock, ttl })
    }

    async fn connection(&self) -> ApplicationResult<Connection> {
        self.pool.get().await.map_err(redis_err)
    }
}

#[async_trait]
impl AuthorizationCodeStore for RedisAuthorizationCodeStore {
    async fn issue(
        &self,
        username: &Username,
        client_id: &ClientId,
    ) -> ApplicationResult<AuthorizationCode> {
        let issued_at = self.clock.now();
        let expires_at = issued_at + expiry_window(self.ttl)?;
        let ttl_secs = self.ttl.as_secs().max(1);
        let mut conn = self.connection().await?;

        loop {
            let entry = AuthorizationCode {
                code: generate_code(),
                username: username.as_str().to_string(),
                client_id: client_id.as_str().to_string(),
                issued_at,
                expires_at,
            };
            let payload = serde_json::to_string(&entry).map_err(redis_err)?;

            // NX so a (vanishingly unlikely) collision never overwrites a live code.
            let stored: Option<String> = redis::cmd("SET")
                .arg(key_for(&entry.client_id, &entry.code))
                .arg(payload)
                .arg("EX")
                .arg(ttl_secs)
                .arg("NX")
                .query_async(&mut conn)
                .await
                .map_err(redis_err)?;

            if stored.is_some() {
                return Ok(entry);
            }
        }
    }

    async fn consume(
        &self,
        code: &str,
        client_id: &ClientId,
    ) -> ApplicationResult<Option<AuthorizationCode>> {
        let mut conn = self.connection().await?;

        let payload: Option<String> = redis::cmd("GETDEL")
            .arg(key_for(client_id.as_str(), code))
            .query_async(&mut conn)
            .await
            .map_err(redis_err)?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        let entry: AuthorizationCode = serde_json::from_str(&payload).map_err(redis_err)?;
        if entry.is_expired_at(self.clock.now()) {
            return Ok(None);
        }
        Ok(Some(entry))
    }

    async fn purge_expired(&self) -> ApplicationResult<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_scoped_by_client() {
        assert_eq!(key_for("c1", "abc"), "auth_code:c1:abc");
        assert_ne!(key_for("c1", "abc"), key_for("c2", "abc"));
    }
}
