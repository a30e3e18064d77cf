// ==================================
// tests/integration/http_api_tests.rs
// ==================================
//! HTTP boundary tests driven through the router with `oneshot`
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

use crate::test_utils::{post_json, send, setup_test_env, store_path};

#[tokio::test]
async fn test_signup_and_login_responses() {
    let (state, _temp_dir) = setup_test_env();

    let (status, body) = post_json(
        &state,
        "/api/signup",
        json!({"username": "alice", "password": "s3cret1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"msg": "Signup success", "username": "alice"}));

    let (status, body) = post_json(
        &state,
        "/api/login",
        json!({"username": "alice", "password": "s3cret1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"msg": "Login success", "username": "alice"}));
}

#[tokio::test]
async fn test_duplicate_signup_is_bad_request() {
    let (state, _temp_dir) = setup_test_env();
    let payload = json!({"username": "alice", "password": "s3cret1"});

    let (status, _) = post_json(&state, "/api/signup", payload.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&state, "/api/signup", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "USER_001");
    assert_eq!(body["error"]["message"], "Username already exists");
}

#[tokio::test]
async fn test_failed_logins_are_unauthorized() {
    let (state, _temp_dir) = setup_test_env();
    post_json(
        &state,
        "/api/signup",
        json!({"username": "bob", "password": "hunter22"}),
    )
    .await;

    let (wrong_status, wrong_body) = post_json(
        &state,
        "/api/login",
        json!({"username": "bob", "password": "hunter23"}),
    )
    .await;
    let (ghost_status, ghost_body) = post_json(
        &state,
        "/api/login",
        json!({"username": "ghost", "password": "hunter22"}),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(ghost_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, ghost_body);
    assert_eq!(wrong_body["error"]["code"], "AUTH_001");
    assert_eq!(
        wrong_body["error"]["message"],
        "Invalid username or password"
    );
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let (state, temp_dir) = setup_test_env();

    let (status, body) = post_json(
        &state,
        "/api/signup",
        json!({"username": "al", "password": "s3cret1"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VAL_001");

    let (status, body) = post_json(
        &state,
        "/api/signup",
        json!({"username": "alice", "password": "short"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VAL_001");

    let (status, body) = post_json(&state, "/api/login", json!({"username": "alice"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VAL_001");

    let request = Request::builder()
        .method("POST")
        .uri("/api/signup")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&state, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VAL_001");

    // rejected requests never touch the store
    assert!(!store_path(&temp_dir).exists());
}

#[tokio::test]
async fn test_storage_failure_is_opaque() {
    let (state, temp_dir) = setup_test_env();
    let data_dir = store_path(&temp_dir).parent().unwrap().to_path_buf();
    std::fs::remove_dir_all(&data_dir).unwrap();
    std::fs::write(&data_dir, b"not a directory").unwrap();

    let (status, body) = post_json(
        &state,
        "/api/login",
        json!({"username": "alice", "password": "s3cret1"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "STORE_001");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(!message.contains(data_dir.to_string_lossy().as_ref()));
    assert!(!message.contains("users.json"));
}

#[tokio::test]
async fn test_health_check() {
    let (state, _temp_dir) = setup_test_env();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&state, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Healthy"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (state, _temp_dir) = setup_test_env();
    let request = Request::builder()
        .uri("/api/logout")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(&state, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
