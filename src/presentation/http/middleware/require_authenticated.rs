// src/presentation/http/middleware/require_authenticated.rs
use crate::application::error::{ApplicationError, AuthError};
use crate::presentation::http::error::HttpError;
use crate::presentation::http::state::HttpState;
use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};

/// Gate for protected routes. Resolves the bearer access token to an
/// `AuthenticatedUser` and stores it in the request extensions for handlers
/// further down the stack.
///
/// Usage: `.route_layer(axum::middleware::from_fn(require_authenticated))`
pub async fn require_authenticated(mut req: Request<Body>, next: Next) -> Response {
    let Some(header) = req.headers().typed_get::<Authorization<Bearer>>() else {
        return HttpError::from_auth(AuthError::Unauthorized).into_response();
    };

    let Some(state) = req.extensions().get::<HttpState>().cloned() else {
        return HttpError::from_error(ApplicationError::infrastructure(
            "application state missing",
        ))
        .into_response();
    };

    match state.services.authenticate_request(header.token()).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(err) => HttpError::from_error(err).into_response(),
    }
}
