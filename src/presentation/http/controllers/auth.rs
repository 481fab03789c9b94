// src/presentation/http/controllers/auth.rs
use crate::application::{
    commands::auth::{AuthorizeCommand, ExchangeCodeCommand, LogoutCommand, RefreshTokenCommand},
    dto::{AuthorizationCodeDto, TokenPairDto},
};
use crate::presentation::http::controllers::require_field;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::BearerToken;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::rejection::JsonRejection, http::StatusCode};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub client_id: Option<String>,
    pub code: Option<String>,
    /// Only checked when present, or when the deployment requires it.
    pub client_secret: Option<String>,
}

#[utoipa::path(
    post,
    path = "/auth/authorize",
    request_body = AuthorizeRequest,
    responses(
        (status = 200, description = "Authorization code issued.", body = AuthorizationCodeDto),
        (status = 400, description = "Missing field.", body = crate::presentation::http::error::ErrorResponse),
        (status = 403, description = "Invalid client or credentials.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(()),
    tag = "Auth"
)]
pub async fn authorize(
    Extension(state): Extension<HttpState>,
    payload: Result<Json<AuthorizeRequest>, JsonRejection>,
) -> HttpResult<Json<AuthorizationCodeDto>> {
    let Json(payload) = payload?;
    let command = AuthorizeCommand {
        username: require_field(payload.username, "username")?,
        password: require_field(payload.password, "password")?,
        client_id: require_field(payload.client_id, "clientId")?,
    };

    state
        .services
        .auth_commands
        .authorize(command)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/auth/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Code exchanged for a token pair.", body = TokenPairDto),
        (status = 400, description = "Missing field.", body = crate::presentation::http::error::ErrorResponse),
        (status = 403, description = "Invalid client or code.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(()),
    tag = "Auth"
)]
pub async fn token(
    Extension(state): Extension<HttpState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> HttpResult<Json<TokenPairDto>> {
    let Json(payload) = payload?;
    let command = ExchangeCodeCommand {
        client_id: require_field(payload.client_id, "clientId")?,
        code: require_field(payload.code, "code")?,
        client_secret: payload.client_secret,
    };

    state
        .services
        .auth_commands
        .exchange(command)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "Token pair rotated.", body = TokenPairDto),
        (status = 401, description = "Invalid or already used refresh token.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Auth"
)]
pub async fn refresh(
    Extension(state): Extension<HttpState>,
    BearerToken(refresh_token): BearerToken,
) -> HttpResult<Json<TokenPairDto>> {
    state
        .services
        .auth_commands
        .refresh(RefreshTokenCommand { refresh_token })
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    delete,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Session revoked."),
        (status = 401, description = "Invalid token.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    Extension(state): Extension<HttpState>,
    BearerToken(access_token): BearerToken,
) -> HttpResult<StatusCode> {
    state
        .services
        .auth_commands
        .logout(LogoutCommand { access_token })
        .await
        .into_http()?;

    Ok(StatusCode::NO_CONTENT)
}
