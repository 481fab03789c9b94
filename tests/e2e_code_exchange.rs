// tests/e2e_code_exchange.rs
use authgate_core::application::{
    commands::auth::{AuthPolicy, AuthorizeCommand, ExchangeCodeCommand},
    error::AuthError,
    ports::authorization_code::AuthorizationCodeStore as _,
};
use axum::http::{Method, StatusCode};
use chrono::Duration;
use serde_json::json;

mod support;

use support::*;

async fn issue_code(app: &TestApp, client_id: &str) -> String {
    app.services
        .auth_commands
        .authorize(AuthorizeCommand {
            username: USERNAME.into(),
            password: PASSWORD.into(),
            client_id: client_id.into(),
        })
        .await
        .expect("authorize")
        .code
}

#[tokio::test]
async fn code_can_be_exchanged_only_once() {
    let app = TestApp::new().await;
    let code = issue_code(&app, CLIENT_ID).await;

    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/token",
            json!({ "clientId": CLIENT_ID, "code": code }),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/token",
            json!({ "clientId": CLIENT_ID, "code": code }),
        ))
        .await;
    assert_error_response(resp, StatusCode::FORBIDDEN, "Invalid code.").await;
}

#[tokio::test]
async fn unknown_code_is_rejected() {
    let app = TestApp::new().await;
    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/token",
            json!({ "clientId": CLIENT_ID, "code": "made-up" }),
        ))
        .await;
    assert_error_response(resp, StatusCode::FORBIDDEN, "Invalid code.").await;
}

#[tokio::test]
async fn code_is_bound_to_the_client_that_requested_it() {
    let app = TestApp::new().await;
    let code = issue_code(&app, CLIENT_ID).await;

    // A different registered client cannot redeem it.
    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/token",
            json!({ "clientId": OTHER_CLIENT_ID, "code": code }),
        ))
        .await;
    assert_error_response(resp, StatusCode::FORBIDDEN, "Invalid code.").await;

    // An unregistered client fails on the client check.
    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/token",
            json!({ "clientId": "ghost", "code": code }),
        ))
        .await;
    assert_error_response(resp, StatusCode::FORBIDDEN, "Invalid clientId.").await;

    // Neither attempt burned the code for its rightful owner.
    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/token",
            json!({ "clientId": CLIENT_ID, "code": code }),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_client_secret_fails_even_with_a_valid_code() {
    let app = TestApp::new().await;
    let code = issue_code(&app, CLIENT_ID).await;

    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/token",
            json!({ "clientId": CLIENT_ID, "code": code, "clientSecret": OTHER_CLIENT_SECRET }),
        ))
        .await;
    assert_error_response(resp, StatusCode::FORBIDDEN, "Invalid clientId.").await;

    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/token",
            json!({ "clientId": CLIENT_ID, "code": code, "clientSecret": CLIENT_SECRET }),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn confidential_deployments_require_the_secret() {
    let app = TestApp::with_policy(AuthPolicy {
        require_client_secret: true,
    })
    .await;
    let code = issue_code(&app, CLIENT_ID).await;

    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/token",
            json!({ "clientId": CLIENT_ID, "code": code }),
        ))
        .await;
    assert_error_response(resp, StatusCode::BAD_REQUEST, "\"clientSecret\" is required").await;
}

#[tokio::test]
async fn missing_fields_are_reported_in_order() {
    let app = TestApp::new().await;

    let resp = app
        .send(json_request(Method::POST, "/auth/token", json!({ "code": "x" })))
        .await;
    assert_error_response(resp, StatusCode::BAD_REQUEST, "\"clientId\" is required").await;

    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/token",
            json!({ "clientId": CLIENT_ID }),
        ))
        .await;
    assert_error_response(resp, StatusCode::BAD_REQUEST, "\"code\" is required").await;
}

#[tokio::test]
async fn expired_code_is_rejected_even_if_never_used() {
    let app = TestApp::new().await;
    let code = issue_code(&app, CLIENT_ID).await;

    app.clock.advance(Duration::seconds(CODE_TTL.as_secs() as i64 + 1));

    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/token",
            json!({ "clientId": CLIENT_ID, "code": code }),
        ))
        .await;
    assert_error_response(resp, StatusCode::FORBIDDEN, "Invalid code.").await;
}

#[tokio::test]
async fn code_is_still_valid_just_before_expiry() {
    let app = TestApp::new().await;
    let code = issue_code(&app, CLIENT_ID).await;

    app.clock.advance(Duration::seconds(CODE_TTL.as_secs() as i64 - 1));

    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/token",
            json!({ "clientId": CLIENT_ID, "code": code }),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn sweep_removes_expired_codes() {
    let app = TestApp::new().await;
    issue_code(&app, CLIENT_ID).await;
    issue_code(&app, OTHER_CLIENT_ID).await;

    assert_eq!(app.services.code_store().purge_expired().await.unwrap(), 0);
    app.clock.advance(Duration::minutes(11));
    assert_eq!(app.services.code_store().purge_expired().await.unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_exchanges_of_one_code_have_a_single_winner() {
    let app = TestApp::new().await;
    let code = issue_code(&app, CLIENT_ID).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let services = app.services.clone();
        let code = code.clone();
        handles.push(tokio::spawn(async move {
            services
                .auth_commands
                .exchange(ExchangeCodeCommand {
                    client_id: CLIENT_ID.into(),
                    code,
                    client_secret: None,
                })
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(err) => assert_eq!(err.auth_kind(), Some(AuthError::InvalidCode)),
        }
    }
    assert_eq!(successes, 1);
}
