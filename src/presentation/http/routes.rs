// src/presentation/http/routes.rs
use crate::presentation::http::state::HttpState;
use crate::presentation::http::{
    controllers::{auth, clients, session, users},
    middleware::{rate_limit_layer, require_authenticated},
    openapi::{self, StatusResponse},
};
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post},
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub rate_limit_enabled: bool,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            rate_limit_enabled: true,
            allowed_origins: Vec::new(),
        }
    }
}

pub fn build_router(state: HttpState) -> Router {
    build_router_with(state, &RouterOptions::default())
}

pub fn build_router_with(state: HttpState, options: &RouterOptions) -> Router {
    let mut auth_routes = Router::new()
        .route("/auth/authorize", post(auth::authorize))
        .route("/auth/token", post(auth::token))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", delete(auth::logout));

    if options.rate_limit_enabled {
        auth_routes = auth_routes.layer(rate_limit_layer());
    }

    let protected_routes = Router::new()
        .route("/session", get(session::current_session))
        .route("/user", post(users::register))
        .route("/client", post(clients::register))
        .route_layer(middleware::from_fn(require_authenticated));

    Router::new()
        .merge(openapi::docs_router())
        .route("/health", get(health))
        .merge(auth_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&options.allowed_origins))
        .layer(Extension(state))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    if allowed_origins.is_empty() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = crate::presentation::http::openapi::StatusResponse)
    ),
    security(()),
    tag = "System"
)]
pub async fn health() -> axum::Json<StatusResponse> {
    axum::Json(StatusResponse {
        status: "ok".into(),
    })
}
