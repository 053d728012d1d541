#![allow(dead_code)]

use api::auth::generate_jwt;
use api::routes::app;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use db::models::user::{self, UserType};
use db::test_utils::setup_test_db;
use serde_json::Value;
use std::time::Duration;
use tempfile::TempDir;
use util::{
    cache::Aggregates, gpa_cache::GpaPopulationCache, state::AppState,
    test_helpers::setup_test_storage_root,
};

/// Router over a fresh in-memory ledger and in-process caches.
pub async fn make_test_app() -> (Router, AppState) {
    let db = setup_test_db().await;
    let app_state = AppState::new(
        db,
        Aggregates::in_memory(),
        GpaPopulationCache::new(Duration::from_secs(3)),
    );
    (app(app_state.clone()), app_state)
}

/// Same as [`make_test_app`], with assignment storage in a temp dir kept alive by the guard.
pub async fn make_test_app_with_storage() -> (Router, AppState, TempDir) {
    let tmp = setup_test_storage_root();
    let (app, app_state) = make_test_app().await;
    (app, app_state, tmp)
}

/// Creates a user and returns it with a bearer token.
pub async fn user_with_token(
    app_state: &AppState,
    code: &str,
    user_type: UserType,
) -> (user::Model, String) {
    let name = format!("User {code}");
    let user = user::Model::create(app_state.db(), code, &name, user_type)
        .await
        .unwrap();
    let (token, _) = generate_jwt(&user.id, user.is_admin());
    (user, token)
}

pub fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn multipart_request(uri: &str, token: &str, file_name: &str, content: &[u8]) -> Request<Body> {
    let boundary = "----campus-ledger-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n").as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
