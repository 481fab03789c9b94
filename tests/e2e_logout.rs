// tests/e2e_logout.rs
use authgate_core::application::error::AuthError;
use axum::http::{Method, StatusCode};
use serde_json::json;

mod support;

use support::*;

#[tokio::test]
async fn logout_twice_yields_204_then_401() {
    let app = TestApp::new().await;
    let pair = app.login(USERNAME, PASSWORD, CLIENT_ID).await;

    let resp = app
        .send(bearer_request(Method::DELETE, "/auth/logout", &pair.access_token))
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .send(bearer_request(Method::DELETE, "/auth/logout", &pair.access_token))
        .await;
    assert_error_response(resp, StatusCode::UNAUTHORIZED, "Invalid token.").await;
}

#[tokio::test]
async fn logout_with_a_refresh_token_is_rejected() {
    let app = TestApp::new().await;
    let pair = app.login(USERNAME, PASSWORD, CLIENT_ID).await;

    let resp = app
        .send(bearer_request(Method::DELETE, "/auth/logout", &pair.refresh_token))
        .await;
    assert_error_response(resp, StatusCode::UNAUTHORIZED, "Invalid token.").await;

    assert!(app.services.authenticate_request(&pair.access_token).await.is_ok());
}

#[tokio::test]
async fn logout_only_ends_the_session_of_one_client() {
    let app = TestApp::new().await;
    let web = app.login(USERNAME, PASSWORD, CLIENT_ID).await;
    let cli = app.login(USERNAME, PASSWORD, OTHER_CLIENT_ID).await;

    let resp = app
        .send(bearer_request(Method::DELETE, "/auth/logout", &web.access_token))
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert!(app.services.authenticate_request(&web.access_token).await.is_err());
    assert!(app.services.authenticate_request(&cli.access_token).await.is_ok());
}

#[tokio::test]
async fn full_session_lifecycle() {
    let app = TestApp::new().await;

    // authorize("alice", "pw", "c1") -> K1
    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/authorize",
            json!({ "username": "alice", "password": "pw", "clientId": "c1" }),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let k1 = read_json(resp).await["code"].as_str().unwrap().to_string();

    // exchange(K1, "c1") -> (A1, R1)
    let resp = app
        .send(json_request(
            Method::POST,
            "/auth/token",
            json!({ "clientId": "c1", "code": k1 }),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    let a1 = body["accessToken"].as_str().unwrap().to_string();
    let r1 = body["refreshToken"].as_str().unwrap().to_string();

    // refresh(R1) -> (A2, R2)
    let resp = app
        .send(bearer_request(Method::POST, "/auth/refresh", &r1))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    let a2 = body["accessToken"].as_str().unwrap().to_string();
    let r2 = body["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(a2, a1);
    assert_ne!(r2, r1);

    // refresh(R1) again -> TokenReuse
    let resp = app
        .send(bearer_request(Method::POST, "/auth/refresh", &r1))
        .await;
    assert_error_response(
        resp,
        StatusCode::UNAUTHORIZED,
        "Refresh token has already been used.",
    )
    .await;

    // logout(A2) -> 204
    let resp = app
        .send(bearer_request(Method::DELETE, "/auth/logout", &a2))
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // authenticateRequest(A2) -> Unauthorized
    let err = app.services.authenticate_request(&a2).await.unwrap_err();
    assert_eq!(err.auth_kind(), Some(AuthError::Unauthorized));

    let resp = app.send(bearer_request(Method::GET, "/session", &a2)).await;
    assert_error_response(resp, StatusCode::UNAUTHORIZED, "Unauthorized.").await;
}
