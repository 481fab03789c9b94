// src/infrastructure/repositories/clients/in_memory.rs
use crate::domain::client::{Client, ClientId, ClientRepository, NewClient};
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryClientRepository {
    clients: Mutex<HashMap<ClientId, Client>>,
}

impl InMemoryClientRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn insert(&self, new_client: NewClient) -> DomainResult<Client> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|_| DomainError::Persistence("client store poisoned".into()))?;
        if clients.contains_key(&new_client.client_id) {
            return Err(DomainError::Conflict("client already exists".into()));
        }
        let client = new_client.into_client();
        clients.insert(client.client_id.clone(), client.clone());
        Ok(client)
    }

    async fn find_by_client_id(&self, client_id: &ClientId) -> DomainResult<Option<Client>> {
        let clients = self
            .clients
            .lock()
            .map_err(|_| DomainError::Persistence("client store poisoned".into()))?;
        Ok(clients.get(client_id).cloned())
    }
}
