// src/infrastructure/repositories/clients/postgres.rs
use super::super::map_sqlx;
use crate::domain::client::{Client, ClientId, ClientRepository, NewClient};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::PasswordHash;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

#[derive(Clone)]
pub struct PostgresClientRepository {
    pool: PgPool,
}

impl PostgresClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ClientRow {
    client_id: String,
    secret_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ClientRow> for Client {
    type Error = DomainError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        Ok(Client {
            client_id: ClientId::new(row.client_id)?,
            secret_hash: PasswordHash::new(row.secret_hash)?,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
    async fn insert(&self, new_client: NewClient) -> DomainResult<Client> {
        let row = sqlx::query_as::<_, ClientRow>(
            "INSERT INTO clients (client_id, secret_hash, created_at)
             VALUES ($1, $2, $3)
             RETURNING client_id, secret_hash, created_at",
        )
        .bind(new_client.client_id.as_str())
        .bind(new_client.secret_hash.as_str())
        .bind(new_client.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Client::try_from(row)
    }

    async fn find_by_client_id(&self, client_id: &ClientId) -> DomainResult<Option<Client>> {
        let row = sqlx::query_as::<_, ClientRow>(
            "SELECT client_id, secret_hash, created_at FROM clients WHERE client_id = $1",
        )
        .bind(client_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(Client::try_from).transpose()
    }
}
