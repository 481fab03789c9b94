// tests/support/helpers.rs
use super::mocks::{ManualClock, StrictPasswordHasher, fake_hash};
use authgate_core::application::{
    commands::auth::{AuthPolicy, AuthorizeCommand, ExchangeCodeCommand},
    dto::TokenPairDto,
    ports::{
        authorization_code::AuthorizationCodeStore,
        security::{PasswordHasher, TokenCodec},
        time::Clock,
    },
    services::ApplicationServices,
};
use authgate_core::domain::client::{ClientRepository, NewClient};
use authgate_core::domain::user::{
    ClientId, DisplayName, NewUser, PasswordHash, UserRepository, Username,
};
use authgate_core::infrastructure::{
    repositories::{InMemoryClientRepository, InMemoryUserStore},
    security::{authorization_code_store::InMemoryAuthorizationCodeStore, token::BiscuitTokenCodec},
};
use authgate_core::presentation::http::{
    routes::{RouterOptions, build_router_with},
    state::HttpState,
};
use axum::{
    Router,
    body::{self, Body},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tower::util::ServiceExt as _;

pub const TEST_PRIVATE_KEY: &str =
    "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

pub const CLIENT_ID: &str = "c1";
pub const CLIENT_SECRET: &str = "c1-secret";
pub const OTHER_CLIENT_ID: &str = "c2";
pub const OTHER_CLIENT_SECRET: &str = "c2-secret";

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "pw";
pub const INACTIVE_USERNAME: &str = "mallory";
pub const ADMIN_USERNAME: &str = "root";
pub const ADMIN_PASSWORD: &str = "rootpass";

pub const CODE_TTL: Duration = Duration::from_secs(600);

/// In-memory application wired like the binary, with a controllable clock
/// and the rate limiter switched off.
pub struct TestApp {
    pub services: Arc<ApplicationServices>,
    pub clock: Arc<ManualClock>,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_policy(AuthPolicy::default()).await
    }

    pub async fn with_policy(policy: AuthPolicy) -> Self {
        let clock = Arc::new(ManualClock::new());
        let dyn_clock: Arc<dyn Clock> = clock.clone();

        let users = Arc::new(InMemoryUserStore::new());
        let clients = Arc::new(InMemoryClientRepository::new());
        let code_store: Arc<dyn AuthorizationCodeStore> = Arc::new(
            InMemoryAuthorizationCodeStore::new(Arc::clone(&dyn_clock), CODE_TTL),
        );
        let password_hasher: Arc<dyn PasswordHasher> = Arc::new(StrictPasswordHasher);
        let token_codec: Arc<dyn TokenCodec> = Arc::new(
            BiscuitTokenCodec::new(
                TEST_PRIVATE_KEY,
                Duration::from_secs(60 * 60),
                Duration::from_secs(60 * 60 * 24 * 30),
                Arc::clone(&dyn_clock),
            )
            .expect("token codec"),
        );

        seed_client(clients.as_ref(), CLIENT_ID, CLIENT_SECRET).await;
        seed_client(clients.as_ref(), OTHER_CLIENT_ID, OTHER_CLIENT_SECRET).await;
        seed_user(users.as_ref(), USERNAME, PASSWORD, false, true).await;
        seed_user(users.as_ref(), INACTIVE_USERNAME, PASSWORD, false, false).await;
        seed_user(users.as_ref(), ADMIN_USERNAME, ADMIN_PASSWORD, true, true).await;

        let services = Arc::new(ApplicationServices::new(
            users.clone(),
            clients,
            users,
            password_hasher,
            token_codec,
            code_store,
            dyn_clock,
            policy,
        ));

        let state = HttpState {
            services: Arc::clone(&services),
        };
        let options = RouterOptions {
            rate_limit_enabled: false,
            allowed_origins: Vec::new(),
        };
        let router = build_router_with(state, &options);

        Self {
            services,
            clock,
            router,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.expect("router call")
    }

    /// Run authorize + exchange through the services and return the pair.
    pub async fn login(&self, username: &str, password: &str, client_id: &str) -> TokenPairDto {
        let code = self
            .services
            .auth_commands
            .authorize(AuthorizeCommand {
                username: username.into(),
                password: password.into(),
                client_id: client_id.into(),
            })
            .await
            .expect("authorize")
            .code;

        self.services
            .auth_commands
            .exchange(ExchangeCodeCommand {
                client_id: client_id.into(),
                code,
                client_secret: None,
            })
            .await
            .expect("exchange")
    }

    pub async fn admin_tokens(&self) -> TokenPairDto {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD, CLIENT_ID).await
    }
}

async fn seed_client(repo: &dyn ClientRepository, client_id: &str, secret: &str) {
    repo.insert(NewClient::new(
        ClientId::new(client_id).unwrap(),
        PasswordHash::new(fake_hash(secret)).unwrap(),
        *super::mocks::EPOCH,
    ))
    .await
    .expect("seed client");
}

async fn seed_user(
    repo: &dyn UserRepository,
    username: &str,
    password: &str,
    is_admin: bool,
    is_active: bool,
) {
    let new_user = NewUser::new(
        Username::new(username).unwrap(),
        DisplayName::new(username).unwrap(),
        PasswordHash::new(fake_hash(password)).unwrap(),
        *super::mocks::EPOCH,
    )
    .with_admin(is_admin)
    .with_active(is_active);
    repo.insert(new_user).await.expect("seed user");
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_json_request(method: Method, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, bearer(token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn bearer_request(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(token))
        .body(Body::empty())
        .unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn read_json(resp: Response) -> Value {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Assert that a response is an ErrorResponse JSON with the expected status and message.
pub async fn assert_error_response(
    resp: Response,
    expected_status: StatusCode,
    expected_message: &str,
) {
    assert_eq!(resp.status(), expected_status);
    let ct = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");

    let json = read_json(resp).await;
    let err_field = json.get("error").and_then(Value::as_str).unwrap_or("");
    let msg_field = json.get("message").and_then(Value::as_str).unwrap_or("");
    assert_eq!(
        err_field,
        expected_status.canonical_reason().unwrap_or("error")
    );
    assert_eq!(msg_field, expected_message);
}
