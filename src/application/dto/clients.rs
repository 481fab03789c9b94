use crate::domain::client::Client;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub client_id: String,
}

impl From<Client> for ClientDto {
    fn from(client: Client) -> Self {
        Self {
            client_id: client.client_id.to_string(),
        }
    }
}
