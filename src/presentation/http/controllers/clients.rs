// src/presentation/http/controllers/clients.rs
use crate::application::{commands::clients::CreateClientCommand, dto::ClientDto};
use crate::presentation::http::controllers::require_field;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::rejection::JsonRejection};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[utoipa::path(
    post,
    path = "/client",
    request_body = CreateClientRequest,
    responses(
        (status = 200, description = "Client registered.", body = ClientDto),
        (status = 400, description = "Invalid input.", body = crate::presentation::http::error::ErrorResponse),
        (status = 401, description = "Unauthorized.", body = crate::presentation::http::error::ErrorResponse),
        (status = 403, description = "Caller is not an administrator.", body = crate::presentation::http::error::ErrorResponse),
        (status = 409, description = "Client already registered.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Clients"
)]
pub async fn register(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    payload: Result<Json<CreateClientRequest>, JsonRejection>,
) -> HttpResult<Json<ClientDto>> {
    let Json(payload) = payload?;
    let command = CreateClientCommand {
        client_id: require_field(payload.client_id, "clientId")?,
        client_secret: require_field(payload.client_secret, "clientSecret")?,
    };

    state
        .services
        .client_commands
        .register(&actor, command)
        .await
        .into_http()
        .map(Json)
}
