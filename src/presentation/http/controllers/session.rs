// src/presentation/http/controllers/session.rs
use crate::application::dto::SessionDto;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};

#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Session of the presented access token.", body = SessionDto),
        (status = 401, description = "Unauthorized.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Auth"
)]
pub async fn current_session(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
) -> HttpResult<Json<SessionDto>> {
    state
        .services
        .user_queries
        .current_session(&user)
        .await
        .into_http()
        .map(Json)
}
