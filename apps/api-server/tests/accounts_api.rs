//! HTTP tests for accounts, user profiles and the API root.

use std::sync::Arc;

use actix_web::{App, http::StatusCode, http::header, test};
use serde_json::{Value, json};

use api_server::configure_app;
use api_server::observability::{REQUEST_ID_HEADER, RequestIdMiddleware};
use api_server::state::AppState;
use scribe_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

macro_rules! app {
    () => {{
        let tokens = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "accounts-api-test-secret".to_string(),
            expiration_hours: 1,
            issuer: "scribe-test".to_string(),
        }));
        let passwords = Arc::new(Argon2PasswordService::with_params(1024, 1, 1).unwrap());
        let state = AppState::in_memory(tokens, passwords, 10);

        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .configure(move |cfg| configure_app(cfg, state)),
        )
        .await
    }};
}

macro_rules! register {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "username": $username, "password": "password123" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body["access_token"].as_str().unwrap().to_string()
    }};
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let app = app!();
    let token = register!(app, "user1");

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["username"], "user1");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "user1", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login: Value = test::read_body_json(resp).await;
    assert_eq!(login["token_type"], "Bearer");
    assert_eq!(login["expires_in"], 3600);

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_login_failures_look_the_same() {
    let app = app!();
    register!(app, "user1");

    for (username, password) in [("user1", "wrong-password"), ("ghost", "password123")] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let problem: Value = test::read_body_json(resp).await;
        assert_eq!(problem["detail"], "Invalid username or password.");
    }
}

#[actix_web::test]
async fn test_register_rejects_duplicates_and_bad_input() {
    let app = app!();
    register!(app, "user1");

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": "user1", "password": "password123" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": "bad name!", "password": "short" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let problem: Value = test::read_body_json(resp).await;
    assert!(problem["errors"]["username"].is_array());
    assert!(problem["errors"]["password"].is_array());
}

#[actix_web::test]
async fn test_user_profile_lists_only_visible_posts() {
    let app = app!();
    let user1 = register!(app, "user1");
    let user2 = register!(app, "user2");

    for (title, published) in [("Public", true), ("Private", false)] {
        let req = test::TestRequest::post()
            .uri("/api/posts/")
            .insert_header(bearer(&user1))
            .set_json(json!({ "title": title, "content": "c", "is_published": published }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    let req = test::TestRequest::get()
        .uri("/api/users/")
        .insert_header(bearer(&user2))
        .to_request();
    let users: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users["count"], 2);

    let owner = users["results"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == "user1")
        .cloned()
        .unwrap();
    assert_eq!(owner["posts"].as_array().unwrap().len(), 1);

    let uri = format!("/api/users/{}/", owner["id"].as_str().unwrap());
    assert!(owner["url"].as_str().unwrap().ends_with(&uri));

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&user1))
        .to_request();
    let own_profile: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(own_profile["posts"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}/", uuid::Uuid::new_v4()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_api_root_and_health() {
    let app = app!();

    let req = test::TestRequest::get().uri("/api/").to_request();
    let root: Value = test::call_and_read_body_json(&app, req).await;
    assert!(root["posts"].as_str().unwrap().ends_with("/api/posts/"));
    assert!(root["users"].as_str().unwrap().ends_with("/api/users/"));

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    let health: Value = test::read_body_json(resp).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["storage"], "memory");
}

#[actix_web::test]
async fn test_request_id_is_propagated() {
    let app = app!();

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header((REQUEST_ID_HEADER, "req-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "req-42");
}

#[actix_web::test]
async fn test_oversized_request_id_is_replaced() {
    let app = app!();
    let oversized = "x".repeat(200);

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header((REQUEST_ID_HEADER, oversized.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let echoed = resp.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
    assert_ne!(echoed, oversized);
    assert!(uuid::Uuid::parse_str(echoed).is_ok());
}
