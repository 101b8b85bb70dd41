//! Annotation API integration tests
//!
//! Runs the full router over the in-memory store.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{TestApp, TestUser, SAMPLE_CONTENT};

async fn create(app: &TestApp, user: &TestUser, text_id: Uuid, content: &str, start: i32, end: i32) -> axum_test::TestResponse {
    app.server
        .post("/api/annotations/create")
        .authorization_bearer(&user.token)
        .json(&json!({
            "textId": text_id,
            "content": content,
            "rangeStart": start,
            "rangeEnd": end,
        }))
        .await
}

async fn list(app: &TestApp, user: &TestUser, text_id: Uuid) -> Value {
    let response = app
        .server
        .get(&format!("/api/annotations/{}", text_id))
        .authorization_bearer(&user.token)
        .await;
    assert_status!(response, StatusCode::OK);
    response.json()
}

fn id_of(value: &Value) -> Uuid {
    value["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.server.get("/health").await;
    assert_status!(response, StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], false);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();
    let response = app
        .server
        .post("/api/annotations/create")
        .json(&json!({ "textId": Uuid::new_v4(), "content": "x", "rangeStart": 0, "rangeEnd": 1 }))
        .await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/api/auth/session")
        .authorization_bearer("not-a-token")
        .await;
    assert_status!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_echoes_identity() {
    let app = TestApp::new();
    let ada = app.user("ada").await;

    let response = app
        .server
        .get("/api/auth/session")
        .authorization_bearer(&ada.token)
        .await;
    assert_status!(response, StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["userId"], ada.id.to_string());
    assert_eq!(body["username"], "ada");
}

#[tokio::test]
async fn test_logout_acknowledges() {
    let app = TestApp::new();
    let ada = app.user("ada").await;

    let response = app
        .server
        .post("/api/auth/logout")
        .authorization_bearer(&ada.token)
        .await;
    assert_status!(response, StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Logged out");

    let response = app.server.post("/api/auth/logout").await;
    assert_status!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_then_merge() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let bob = app.user("bob").await;
    let text = app.text(&ada, SAMPLE_CONTENT).await;

    let response = create(&app, &ada, text.id, "first", 10, 20).await;
    assert_status!(response, StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["range_start"], 10);
    assert_eq!(created["range_end"], 20);
    assert_eq!(created["votes"], 0);

    let response = create(&app, &bob, text.id, "second", 15, 25).await;
    assert_status!(response, StatusCode::CREATED);
    let merged: Value = response.json();
    assert_eq!(merged["message"], "Annotation merged successfully");
    assert_eq!(merged["annotation"]["id"], created["id"]);
    assert_eq!(merged["annotation"]["range_start"], 10);
    assert_eq!(merged["annotation"]["range_end"], 25);
    assert_eq!(merged["reply"]["content"], "second");

    let listing = list(&app, &ada, text.id).await;
    assert_eq!(listing["annotations"].as_array().unwrap().len(), 1);
    assert_eq!(listing["annotations"][0]["username"], "ada");
    assert_eq!(listing["replies"].as_array().unwrap().len(), 1);
    assert_eq!(listing["replies"][0]["username"], "bob");
    assert_eq!(listing["replies"][0]["annotation_id"], created["id"]);
}

#[tokio::test]
async fn test_disjoint_and_adjacent_ranges_stay_separate() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let text = app.text(&ada, SAMPLE_CONTENT).await;

    assert_status!(create(&app, &ada, text.id, "a", 0, 5).await, StatusCode::CREATED);
    assert_status!(create(&app, &ada, text.id, "b", 5, 10).await, StatusCode::CREATED);
    assert_status!(create(&app, &ada, text.id, "c", 30, 35).await, StatusCode::CREATED);

    let listing = list(&app, &ada, text.id).await;
    let starts: Vec<i64> = listing["annotations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["range_start"].as_i64().unwrap())
        .collect();
    assert_eq!(starts, vec![0, 5, 30]);
    assert!(listing["replies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_validation() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let text = app.text(&ada, SAMPLE_CONTENT).await;

    let body = assert_error_body!(create(&app, &ada, text.id, "x", 8, 8).await, StatusCode::BAD_REQUEST);
    assert_contains!(body["error"].as_str().unwrap(), "rangeEnd");

    assert_error_body!(create(&app, &ada, text.id, "x", -2, 3).await, StatusCode::BAD_REQUEST);
    assert_error_body!(create(&app, &ada, text.id, "x", 0, 41).await, StatusCode::BAD_REQUEST);
    assert_error_body!(create(&app, &ada, text.id, "  ", 0, 4).await, StatusCode::BAD_REQUEST);
    assert_error_body!(create(&app, &ada, Uuid::new_v4(), "x", 0, 4).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_missing_fields_are_validation_errors() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let text = app.text(&ada, SAMPLE_CONTENT).await;

    let response = app
        .server
        .post("/api/annotations/create")
        .authorization_bearer(&ada.token)
        .json(&json!({ "textId": text.id, "rangeStart": 0, "rangeEnd": 5 }))
        .await;
    let body = assert_error_body!(response, StatusCode::BAD_REQUEST);
    assert_contains!(body["error"].as_str().unwrap(), "content");

    let response = app
        .server
        .post("/api/annotations/create")
        .authorization_bearer(&ada.token)
        .json(&json!({ "textId": text.id, "content": "x", "rangeStart": 0 }))
        .await;
    let body = assert_error_body!(response, StatusCode::BAD_REQUEST);
    assert_contains!(body["error"].as_str().unwrap(), "rangeEnd");
}

#[tokio::test]
async fn test_list_unknown_text() {
    let app = TestApp::new();
    let ada = app.user("ada").await;

    let response = app
        .server
        .get(&format!("/api/annotations/{}", Uuid::new_v4()))
        .authorization_bearer(&ada.token)
        .await;
    assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_vote_once_per_user() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let bob = app.user("bob").await;
    let text = app.text(&ada, SAMPLE_CONTENT).await;
    let annotation: Value = create(&app, &ada, text.id, "a", 0, 5).await.json();
    let vote_path = format!("/api/annotations/{}/vote", id_of(&annotation));

    let response = app
        .server
        .post(&vote_path)
        .authorization_bearer(&bob.token)
        .json(&json!({ "voteValue": 1 }))
        .await;
    assert_status!(response, StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["votes"], 1);

    let response = app
        .server
        .post(&vote_path)
        .authorization_bearer(&bob.token)
        .json(&json!({ "voteValue": -1 }))
        .await;
    let body = assert_error_body!(response, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User has already voted");

    let listing = list(&app, &ada, text.id).await;
    assert_eq!(listing["annotations"][0]["votes"], 1);
}

#[tokio::test]
async fn test_vote_value_must_be_unit() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let text = app.text(&ada, SAMPLE_CONTENT).await;
    let annotation: Value = create(&app, &ada, text.id, "a", 0, 5).await.json();

    let response = app
        .server
        .post(&format!("/api/annotations/{}/vote", id_of(&annotation)))
        .authorization_bearer(&ada.token)
        .json(&json!({ "voteValue": 3 }))
        .await;
    assert_error_body!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reply_and_reply_vote() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let bob = app.user("bob").await;
    let text = app.text(&ada, SAMPLE_CONTENT).await;
    let annotation: Value = create(&app, &ada, text.id, "a", 0, 5).await.json();

    let response = app
        .server
        .post("/api/annotations/reply")
        .authorization_bearer(&bob.token)
        .json(&json!({ "annotationId": annotation["id"], "content": "agreed" }))
        .await;
    assert_status!(response, StatusCode::CREATED);
    let reply: Value = response.json();
    assert_eq!(reply["votes"], 0);
    assert_eq!(reply["user_id"], bob.id.to_string());

    let response = app
        .server
        .post(&format!("/api/annotations/{}/reply-vote", id_of(&reply)))
        .authorization_bearer(&ada.token)
        .json(&json!({ "voteValue": -1 }))
        .await;
    assert_status!(response, StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["votes"], -1);
}

#[tokio::test]
async fn test_reply_validation() {
    let app = TestApp::new();
    let ada = app.user("ada").await;

    let response = app
        .server
        .post("/api/annotations/reply")
        .authorization_bearer(&ada.token)
        .json(&json!({ "content": "orphan" }))
        .await;
    assert_error_body!(response, StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/annotations/reply")
        .authorization_bearer(&ada.token)
        .json(&json!({ "annotationId": Uuid::new_v4(), "content": "lost" }))
        .await;
    assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_annotation_authorization_and_cascade() {
    let app = TestApp::new();
    let owner = app.user("owner").await;
    let author = app.user("author").await;
    let stranger = app.user("stranger").await;
    let text = app.text(&owner, SAMPLE_CONTENT).await;

    let annotation: Value = create(&app, &author, text.id, "a", 0, 10).await.json();
    create(&app, &stranger, text.id, "b", 5, 12).await;
    let delete_path = format!("/api/annotations/{}/delete", id_of(&annotation));

    let response = app
        .server
        .delete(&delete_path)
        .authorization_bearer(&stranger.token)
        .await;
    assert_error_body!(response, StatusCode::FORBIDDEN);

    let response = app
        .server
        .delete(&delete_path)
        .authorization_bearer(&owner.token)
        .await;
    assert_status!(response, StatusCode::OK);

    let listing = list(&app, &owner, text.id).await;
    assert!(listing["annotations"].as_array().unwrap().is_empty());
    assert!(listing["replies"].as_array().unwrap().is_empty());

    let response = app
        .server
        .delete(&delete_path)
        .authorization_bearer(&owner.token)
        .await;
    assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_reply_keeps_annotation() {
    let app = TestApp::new();
    let ada = app.user("ada").await;
    let bob = app.user("bob").await;
    let text = app.text(&ada, SAMPLE_CONTENT).await;
    let annotation: Value = create(&app, &ada, text.id, "a", 0, 10).await.json();
    let merged: Value = create(&app, &bob, text.id, "b", 2, 4).await.json();
    let reply_path = format!("/api/annotations/reply/{}/delete", id_of(&merged["reply"]));

    let response = app
        .server
        .delete(&reply_path)
        .authorization_bearer(&bob.token)
        .await;
    assert_status!(response, StatusCode::OK);

    let listing = list(&app, &ada, text.id).await;
    assert_eq!(listing["annotations"][0]["id"], annotation["id"]);
    assert!(listing["replies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_database_routes_unavailable_without_pool() {
    let app = TestApp::new();
    let ada = app.user("ada").await;

    let response = app
        .server
        .get("/api/texts")
        .authorization_bearer(&ada.token)
        .await;
    assert_error_body!(response, StatusCode::SERVICE_UNAVAILABLE);

    let response = app
        .server
        .get("/api/friends/list")
        .authorization_bearer(&ada.token)
        .await;
    assert_error_body!(response, StatusCode::SERVICE_UNAVAILABLE);

    let response = app
        .server
        .post("/api/auth/signup")
        .json(&json!({ "username": "carol", "email": "carol@example.com", "password": "password123" }))
        .await;
    assert_error_body!(response, StatusCode::SERVICE_UNAVAILABLE);
}
