use crate::domain::user::value_objects::{ClientId, PasswordHash};
use chrono::{DateTime, Utc};

/// A registered relying application. Read-only to the auth flows.
#[derive(Debug, Clone)]
pub struct Client {
    pub client_id: ClientId,
    pub secret_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub client_id: ClientId,
    pub secret_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
}

impl NewClient {
    pub fn new(client_id: ClientId, secret_hash: PasswordHash, created_at: DateTime<Utc>) -> Self {
        Self {
            client_id,
            secret_hash,
            created_at,
        }
    }

    pub fn into_client(self) -> Client {
        Client {
            client_id: self.client_id,
            secret_hash: self.secret_hash,
            created_at: self.created_at,
        }
    }
}
