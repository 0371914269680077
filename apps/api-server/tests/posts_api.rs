//! HTTP tests for the post endpoints against in-memory stores.

use std::sync::Arc;

use actix_web::{App, http::StatusCode, http::header, test};
use serde_json::{Value, json};

use api_server::configure_app;
use api_server::observability::RequestIdMiddleware;
use api_server::state::AppState;
use scribe_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

fn test_state(page_size: u64) -> AppState {
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "posts-api-test-secret".to_string(),
        expiration_hours: 1,
        issuer: "scribe-test".to_string(),
    }));
    let passwords = Arc::new(Argon2PasswordService::with_params(1024, 1, 1).unwrap());

    AppState::in_memory(tokens, passwords, page_size)
}

macro_rules! app {
    ($page_size:expr) => {{
        let state = test_state($page_size);
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .configure(move |cfg| configure_app(cfg, state)),
        )
        .await
    }};
}

/// Register `username` and return its bearer token.
macro_rules! register {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "username": $username, "password": "password123" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body["access_token"].as_str().unwrap().to_string()
    }};
}

/// Create a post as `token` and return the response body.
macro_rules! create_post {
    ($app:expr, $token:expr, $title:expr, $published:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/posts/")
            .insert_header(bearer(&$token))
            .set_json(json!({
                "title": $title,
                "content": "Some content",
                "is_published": $published,
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

fn detail_uri(post: &Value) -> String {
    format!("/api/posts/{}/", post["id"].as_str().unwrap())
}

#[actix_web::test]
async fn test_unpublished_post_lifecycle() {
    let app = app!(10);
    let user1 = register!(app, "user1");
    let user2 = register!(app, "user2");

    let post = create_post!(app, user1, "Draft notes", false);
    let uri = detail_uri(&post);
    assert_eq!(post["author"], "user1");
    assert_eq!(post["is_published"], false);

    // anonymous list excludes the draft
    let req = test::TestRequest::get().uri("/api/posts/").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["count"], 0);
    assert_eq!(list["results"], json!([]));

    let req = test::TestRequest::get().uri(&uri).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&user2))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&user1))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // a draft the requester cannot see is not found for writes as well
    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(bearer(&user2))
        .set_json(json!({ "title": "Hijacked" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(bearer(&user1))
        .set_json(json!({ "title": "Final notes" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["title"], "Final notes");
    assert_eq!(updated["slug"], post["slug"]);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&user1))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["title"], "Final notes");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&user1))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    for token in [None, Some(&user1), Some(&user2)] {
        let mut req = test::TestRequest::get().uri(&uri);
        if let Some(token) = token {
            req = req.insert_header(bearer(token));
        }
        assert_eq!(
            test::call_service(&app, req.to_request()).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}

#[actix_web::test]
async fn test_non_owner_cannot_modify_published_post() {
    let app = app!(10);
    let user1 = register!(app, "user1");
    let user2 = register!(app, "user2");

    let post = create_post!(app, user1, "Public post", true);
    let uri = detail_uri(&post);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&user2))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(bearer(&user2))
        .set_json(json!({ "title": "Hijacked" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&user2))
        .set_json(json!({ "title": "Hijacked", "content": "x" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&user2))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::get().uri(&uri).to_request();
    let unchanged: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unchanged["title"], "Public post");
}

#[actix_web::test]
async fn test_anonymous_writes_are_forbidden() {
    let app = app!(10);
    let user1 = register!(app, "user1");
    let post = create_post!(app, user1, "Public post", true);

    let req = test::TestRequest::post()
        .uri("/api/posts/")
        .set_json(json!({ "title": "Anon", "content": "nope" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::get().uri("/api/posts/").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["count"], 1);

    let req = test::TestRequest::delete()
        .uri(&detail_uri(&post))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // refused before the post is looked up
    let req = test::TestRequest::patch()
        .uri(&format!("/api/posts/{}/", uuid::Uuid::new_v4()))
        .set_json(json!({ "title": "x" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
}

#[actix_web::test]
async fn test_author_in_body_is_ignored() {
    let app = app!(10);
    let user1 = register!(app, "user1");
    let _user2 = register!(app, "user2");

    let req = test::TestRequest::post()
        .uri("/api/posts/")
        .insert_header(bearer(&user1))
        .set_json(json!({
            "title": "Hello World",
            "content": "Body",
            "author": "user2",
            "slug": "chosen-by-client",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let post: Value = test::read_body_json(resp).await;
    assert_eq!(post["author"], "user1");
    assert!(post["slug"].as_str().unwrap().starts_with("hello-world-"));
    assert_eq!(post["is_published"], false);
    assert!(post["url"].as_str().unwrap().ends_with(&detail_uri(&post)));
}

#[actix_web::test]
async fn test_invalid_bodies_are_rejected() {
    let app = app!(10);
    let user1 = register!(app, "user1");

    let req = test::TestRequest::post()
        .uri("/api/posts/")
        .insert_header(bearer(&user1))
        .set_json(json!({ "title": "x".repeat(151) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let problem: Value = test::read_body_json(resp).await;
    assert!(problem["errors"]["title"].is_array());
    assert!(problem["errors"]["content"].is_array());

    let post = create_post!(app, user1, "Keep me", true);

    // full replacement needs every required field
    let req = test::TestRequest::put()
        .uri(&detail_uri(&post))
        .insert_header(bearer(&user1))
        .set_json(json!({ "title": "Only a title" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let problem: Value = test::read_body_json(resp).await;
    assert!(problem["errors"]["content"].is_array());

    let req = test::TestRequest::post()
        .uri("/api/posts/")
        .insert_header(bearer(&user1))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_list_is_paginated() {
    let app = app!(2);
    let user1 = register!(app, "user1");
    for title in ["First", "Second", "Third"] {
        create_post!(app, user1, title, true);
    }

    let req = test::TestRequest::get().uri("/api/posts/").to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["count"], 3);
    assert_eq!(first["results"].as_array().unwrap().len(), 2);
    assert!(first["previous"].is_null());
    assert!(first["next"].as_str().unwrap().ends_with("/api/posts/?page=2"));

    let req = test::TestRequest::get().uri("/api/posts/?page=2").to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(second["results"].as_array().unwrap().len(), 1);
    assert!(second["next"].is_null());
    assert!(second["previous"].as_str().unwrap().ends_with("/api/posts/"));

    for page in ["3", "0", "abc"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/?page={}", page))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let problem: Value = test::read_body_json(resp).await;
        assert_eq!(problem["detail"], "Invalid page.");
    }
}

#[actix_web::test]
async fn test_owner_sees_own_drafts_in_list() {
    let app = app!(10);
    let user1 = register!(app, "user1");
    let user2 = register!(app, "user2");

    create_post!(app, user1, "Mine, draft", false);
    create_post!(app, user2, "Theirs, draft", false);
    create_post!(app, user2, "Theirs, public", true);

    let req = test::TestRequest::get()
        .uri("/api/posts/")
        .insert_header(bearer(&user1))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(list["count"], 2);
    let titles: Vec<&str> = list["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Mine, draft"));
    assert!(titles.contains(&"Theirs, public"));
}

#[actix_web::test]
async fn test_bad_token_is_unauthorized() {
    let app = app!(10);

    let req = test::TestRequest::get()
        .uri("/api/posts/")
        .insert_header(bearer("not-a-token"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::get()
        .uri("/api/posts/")
        .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_anonymous_writes_are_forbidden_whatever_the_body() {
    let app = app!(10);
    let user1 = register!(app, "user1");
    let post = create_post!(app, user1, "Public post", true);

    let form_create = test::TestRequest::post()
        .uri("/api/posts/")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("title=Anon&content=nope")
        .to_request();
    let empty_create = test::TestRequest::post().uri("/api/posts/").to_request();
    let form_patch = test::TestRequest::patch()
        .uri(&format!("/api/posts/{}/", uuid::Uuid::new_v4()))
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("title=x")
        .to_request();
    let garbled_put = test::TestRequest::put()
        .uri(&detail_uri(&post))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();

    for req in [form_create, empty_create, form_patch, garbled_put] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let problem: Value = test::read_body_json(resp).await;
        assert_eq!(problem["status"], 403);
    }

    let req = test::TestRequest::get().uri("/api/posts/").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["count"], 1);
}

#[actix_web::test]
async fn test_body_errors_only_reach_permitted_writers() {
    let app = app!(10);
    let user1 = register!(app, "user1");
    let user2 = register!(app, "user2");
    let post = create_post!(app, user1, "Public post", true);

    let req = test::TestRequest::patch()
        .uri(&detail_uri(&post))
        .insert_header(bearer(&user2))
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("title=Hijacked")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::patch()
        .uri(&detail_uri(&post))
        .insert_header(bearer(&user1))
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("title=Renamed")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["status"], 400);
}

#[actix_web::test]
async fn test_malformed_id_is_a_problem_not_found() {
    let app = app!(10);

    for uri in ["/api/posts/not-a-uuid/", "/api/users/42/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let problem: Value = test::read_body_json(resp).await;
        assert_eq!(problem["status"], 404);
        assert_eq!(problem["title"], "Not Found");
    }
}
