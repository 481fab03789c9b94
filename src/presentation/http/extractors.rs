// src/presentation/http/extractors.rs
use crate::{
    application::{
        dto::AuthenticatedUser,
        error::{ApplicationError, AuthError},
    },
    presentation::http::state::HttpState,
};
use axum::{Extension, extract::FromRequestParts, http::request::Parts};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};

use super::error::HttpError;

/// Caller resolved from a bearer access token. Reuses the identity placed in
/// request extensions by `require_authenticated` when that middleware ran.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedUser);

/// Raw bearer token, without any verification. Missing or malformed headers
/// are rejected as `InvalidToken`.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

pub(crate) fn bearer_from_parts(parts: &Parts) -> Option<String> {
    parts
        .headers
        .typed_get::<Authorization<Bearer>>()
        .map(|header| header.token().to_string())
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_from_parts(parts)
            .map(Self)
            .ok_or_else(|| HttpError::from_auth(AuthError::InvalidToken))
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(Self(user.clone()));
        }

        let Extension(app_state) = Extension::<HttpState>::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                HttpError::from_error(ApplicationError::infrastructure(
                    "application state missing",
                ))
            })?;

        let token =
            bearer_from_parts(parts).ok_or_else(|| HttpError::from_auth(AuthError::Unauthorized))?;

        let user = app_state
            .services
            .authenticate_request(&token)
            .await
            .map_err(HttpError::from_error)?;

        Ok(Self(user))
    }
}
