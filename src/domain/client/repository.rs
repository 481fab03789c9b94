use crate::domain::client::entity::{Client, NewClient};
use crate::domain::errors::DomainResult;
use crate::domain::user::value_objects::ClientId;
use async_trait::async_trait;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn insert(&self, new_client: NewClient) -> DomainResult<Client>;

    async fn find_by_client_id(&self, client_id: &ClientId) -> DomainResult<Option<Client>>;
}
