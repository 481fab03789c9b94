use crate::domain::user::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub username: String,
    pub display_name: String,
    pub is_admin: bool,
    pub is_active: bool,
    /// Clients the user currently holds a session with.
    pub clients: Vec<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        let clients = user
            .active_clients()
            .map(|client_id| client_id.to_string())
            .collect();
        Self {
            username: user.username.to_string(),
            display_name: user.display_name.to_string(),
            is_admin: user.is_admin,
            is_active: user.is_active,
            clients,
        }
    }
}
