// src/infrastructure/security/authorization_code_store.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    authorization_code::{AuthorizationCode, AuthorizationCodeStore},
    time::Clock,
};
use crate::domain::user::{ClientId, Username};
use argon2::password_hash::rand_core::{OsRng, RngCore};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Duration as ChronoDuration;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

const CODE_BYTES: usize = 32;

/// 256 bits from the OS RNG, URL-safe base64 without padding.
pub(crate) fn generate_code() -> String {
    let mut bytes = [0u8; CODE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub(crate) fn expiry_window(ttl: Duration) -> ApplicationResult<ChronoDuration> {
    ChronoDuration::from_std(ttl).map_err(|err| ApplicationError::infrastructure(err.to_string()))
}

pub struct InMemoryAuthorizationCodeStore {
    // code -> AuthorizationCode
    inner: Mutex<HashMap<String, AuthorizationCode>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl InMemoryAuthorizationCodeStore {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            clock,
            ttl,
        }
    }

    fn lock(&self) -> ApplicationResult<MutexGuard<'_, HashMap<String, AuthorizationCode>>> {
        self.inner
            .lock()
            .map_err(|_| ApplicationError::infrastructure("authorization code store poisoned"))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

#[async_trait]
impl AuthorizationCodeStore for InMemoryAuthorizationCodeStore {
    async fn issue(
        &self,
        username: &Username,
        client_id: &ClientId,
    ) -> ApplicationResult<AuthorizationCode> {
        let issued_at = self.clock.now();
        let expires_at = issued_at + expiry_window(self.ttl)?;

        let mut guard = self.lock()?;
        let code = loop {
            let candidate = generate_code();
            if !guard.contains_key(&candidate) {
                break candidate;
            }
        };

        let entry = AuthorizationCode {
            code: code.clone(),
            username: username.as_str().to_string(),
            client_id: client_id.as_str().to_string(),
            issued_at,
            expires_at,
        };
        guard.insert(code, entry.clone());
        Ok(entry)
    }

    async fn consume(
        &self,
        code: &str,
        client_id: &ClientId,
    ) -> ApplicationResult<Option<AuthorizationCode>> {
        let now = self.clock.now();
        let mut guard = self.lock()?;

        let Some(entry) = guard.get(code) else {
            return Ok(None);
        };

        if entry.is_expired_at(now) {
            guard.remove(code);
            return Ok(None);
        }

        if entry.client_id != client_id.as_str() {
            return Ok(None);
        }

        Ok(guard.remove(code))
    }

    async fn purge_expired(&self) -> ApplicationResult<usize> {
        let now = self.clock.now();
        let mut guard = self.lock()?;
        let before = guard.len();
        guard.retain(|_, entry| !entry.is_expired_at(now));
        Ok(before - guard.len())
    }
}
