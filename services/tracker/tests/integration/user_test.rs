use axum::http::{HeaderName, HeaderValue, StatusCode};
use serde_json::{Value, json};

use crate::helpers::{create_record, register, test_server};

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_health_probes_with_request_id() {
    let server = test_server().await;

    let live = server.get("/healthz").await;
    live.assert_status_ok();
    assert!(live.headers().get("x-request-id").is_some());

    server.get("/readyz").await.assert_status_ok();
}

#[tokio::test]
async fn should_echo_client_request_id() {
    let server = test_server().await;
    let resp = server
        .get("/healthz")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-me-42"),
        )
        .await;
    assert_eq!(resp.headers()["x-request-id"], "trace-me-42");
}

// ── Register / login ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_and_authenticate_without_leaking_password() {
    let server = test_server().await;

    let created = server
        .post("/users")
        .json(&json!({
            "username": "alice",
            "password": "secret1",
            "favorite_genres": ["sci-fi"],
            "email": "alice@example.com",
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let body: Value = created.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["favorite_genres"], json!(["sci-fi"]));
    assert_eq!(body["data"]["records"], json!([]));
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());

    let wrong = server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": "wrong-pass" }))
        .await;
    wrong.assert_status(StatusCode::UNAUTHORIZED);

    let ok = server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": "secret1" }))
        .await;
    ok.assert_status_ok();
    let body: Value = ok.json();
    assert_eq!(body["data"]["username"], "alice");
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn should_reject_unknown_user_and_wrong_password_identically() {
    let server = test_server().await;
    register(&server, "alice", "secret1").await;

    let wrong = server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": "nope-nope" }))
        .await;
    let unknown = server
        .post("/auth/login")
        .json(&json!({ "username": "mallory", "password": "secret1" }))
        .await;

    wrong.assert_status(StatusCode::UNAUTHORIZED);
    unknown.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.json::<Value>(), unknown.json::<Value>());
    assert_eq!(
        unknown.json::<Value>(),
        json!({ "success": false, "error": "Invalid username or password" })
    );
}

#[tokio::test]
async fn should_conflict_on_duplicate_username() {
    let server = test_server().await;
    register(&server, "alice", "secret1").await;

    let again = server
        .post("/users")
        .json(&json!({ "username": "alice", "password": "another1" }))
        .await;
    again.assert_status(StatusCode::CONFLICT);
    let body: Value = again.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn should_reject_invalid_registration() {
    let server = test_server().await;

    let short = server
        .post("/users")
        .json(&json!({ "username": "al", "password": "secret1" }))
        .await;
    short.assert_status(StatusCode::BAD_REQUEST);

    let weak = server
        .post("/users")
        .json(&json!({ "username": "alice", "password": "12345" }))
        .await;
    weak.assert_status(StatusCode::BAD_REQUEST);

    let malformed = server
        .post("/users")
        .text("{\"username\": ")
        .content_type("application/json")
        .await;
    malformed.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = malformed.json();
    assert_eq!(body["success"], false);
}

// ── Read / update / delete ───────────────────────────────────────────────────

#[tokio::test]
async fn should_get_and_list_users() {
    let server = test_server().await;
    let alice = register(&server, "alice", "secret1").await;
    register(&server, "bob", "secret1").await;
    create_record(&server, alice, "123", 0, 400).await;

    let one = server.get(&format!("/users/{alice}")).await;
    one.assert_status_ok();
    let body: Value = one.json();
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["records"][0]["isbn"], "123");

    let all: Value = server.get("/users").await.json();
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let filtered: Value = server
        .get("/users")
        .add_query_param("username", "bob")
        .await
        .json();
    assert_eq!(filtered["data"].as_array().unwrap().len(), 1);
    assert_eq!(filtered["data"][0]["username"], "bob");
    assert_eq!(filtered["data"][0]["records"], json!([]));
}

#[tokio::test]
async fn should_map_missing_and_malformed_ids() {
    let server = test_server().await;
    server
        .get("/users/999")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/users/abc")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_update_user_and_keep_absent_fields() {
    let server = test_server().await;
    let resp = server
        .post("/users")
        .json(&json!({
            "username": "alice",
            "password": "secret1",
            "favorite_genres": ["fantasy"],
        }))
        .await;
    let id = resp.json::<Value>()["data"]["id"].as_i64().unwrap();

    let updated = server
        .put(&format!("/users/{id}"))
        .json(&json!({ "username": "alice2", "password": "newpass1" }))
        .await;
    updated.assert_status_ok();
    let body: Value = updated.json();
    assert_eq!(body["data"]["username"], "alice2");
    assert_eq!(body["data"]["favorite_genres"], json!(["fantasy"]));

    server
        .post("/auth/login")
        .json(&json!({ "username": "alice2", "password": "newpass1" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn should_conflict_when_renaming_onto_taken_username() {
    let server = test_server().await;
    register(&server, "alice", "secret1").await;
    let bob = register(&server, "bob", "secret1").await;

    server
        .put(&format!("/users/{bob}"))
        .json(&json!({ "username": "alice", "password": "secret1" }))
        .await
        .assert_status(StatusCode::CONFLICT);
    server
        .put("/users/999")
        .json(&json!({ "username": "carol", "password": "secret1" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_cascade_records_when_deleting_user() {
    let server = test_server().await;
    let alice = register(&server, "alice", "secret1").await;
    let bob = register(&server, "bob", "secret1").await;
    create_record(&server, alice, "111", 0, 100).await;
    create_record(&server, alice, "222", 0, 100).await;
    create_record(&server, bob, "111", 0, 100).await;

    let deleted = server.delete(&format!("/users/{alice}")).await;
    deleted.assert_status_ok();
    assert_eq!(
        deleted.json::<Value>(),
        json!({ "success": true, "message": "User deleted successfully" })
    );

    let left: Value = server.get("/records").await.json();
    let left = left["data"].as_array().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0]["userID"], bob);

    server
        .delete(&format!("/users/{alice}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
