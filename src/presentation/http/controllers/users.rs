// src/presentation/http/controllers/users.rs
use crate::application::{commands::users::RegisterUserCommand, dto::UserDto};
use crate::presentation::http::controllers::require_field;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::rejection::JsonRejection};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[utoipa::path(
    post,
    path = "/user",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "User registered.", body = UserDto),
        (status = 400, description = "Invalid input.", body = crate::presentation::http::error::ErrorResponse),
        (status = 401, description = "Unauthorized.", body = crate::presentation::http::error::ErrorResponse),
        (status = 403, description = "Caller is not an administrator.", body = crate::presentation::http::error::ErrorResponse),
        (status = 409, description = "Username already taken.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Users"
)]
pub async fn register(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> HttpResult<Json<UserDto>> {
    let Json(payload) = payload?;
    let command = RegisterUserCommand {
        username: require_field(payload.username, "username")?,
        password: require_field(payload.password, "password")?,
        display_name: require_field(payload.display_name, "displayName")?,
        is_admin: payload.is_admin,
        is_active: payload.is_active,
    };

    state
        .services
        .user_commands
        .register(&actor, command)
        .await
        .into_http()
        .map(Json)
}
