// tests/support/mocks.rs
use authgate_core::application::{
    ApplicationResult,
    error::{ApplicationError, AuthError},
    ports::{security::PasswordHasher, time::Clock},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;
use std::sync::Mutex;

/// Fixed starting instant shared by every test clock.
pub static EPOCH: Lazy<DateTime<Utc>> =
    Lazy::new(|| Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap());

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(*EPOCH),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Deterministic stand-in for Argon2: `hash(p) == "hash::" + p`.
pub struct StrictPasswordHasher;

pub fn fake_hash(password: &str) -> String {
    format!("hash::{password}")
}

#[async_trait::async_trait]
impl PasswordHasher for StrictPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(fake_hash(password))
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()> {
        if expected_hash == fake_hash(password) {
            Ok(())
        } else {
            Err(ApplicationError::from(AuthError::InvalidPassword))
        }
    }
}
