//! Integration tests for registration and identity resolution.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;

use study_helper_integration_tests::{AsIdentity, TestServer, send};

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_applies_defaults() {
    let server = TestServer::empty().await;
    let (status, account) = send(server.post(
        "/api/auth/register",
        &json!({
            "firebaseUid": "uid-new",
            "email": "Jordan@Example.COM",
            "name": "  Jordan  "
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(account["name"], "Jordan");
    assert_eq!(account["email"], "Jordan@example.com");
    assert_eq!(account["points"], 0);
    assert_eq!(account["rank"], "Bronze Helper");
    assert_eq!(account["questionsAnswered"], 0);
    assert!(account["id"].as_str().is_some_and(|id| uuid::Uuid::parse_str(id).is_ok()));
    assert!(account["createdAt"].is_string());
}

#[tokio::test]
async fn test_register_assigns_distinct_ids() {
    let server = TestServer::empty().await;
    let mut ids = Vec::new();
    for n in 0..5 {
        let (status, account) = send(server.post(
            "/api/auth/register",
            &json!({
                "firebaseUid": format!("uid-{n}"),
                "email": format!("student{n}@example.com"),
                "name": format!("Student {n}")
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        ids.push(account["id"].as_str().unwrap().to_owned());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[tokio::test]
async fn test_register_rejects_duplicates() {
    let server = TestServer::seeded().await;
    let (status, body) = send(server.post(
        "/api/auth/register",
        &json!({
            "firebaseUid": "demo-user-1",
            "email": "alex.chen@example.com",
            "name": "Impostor"
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid user data");
    let fields: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["firebaseUid", "email"]);
}

#[tokio::test]
async fn test_register_rejects_bad_email() {
    let server = TestServer::empty().await;
    let (status, body) = send(server.post(
        "/api/auth/register",
        &json!({ "firebaseUid": "u", "email": "nope", "name": "N" }),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "email");
}

// ============================================================================
// Current Account
// ============================================================================

#[tokio::test]
async fn test_me_resolves_identity_header() {
    let server = TestServer::seeded().await;
    let (status, me) = send(server.get("/api/auth/me").as_identity("demo-user-3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "David Kim");
}

#[tokio::test]
async fn test_me_unknown_identity_is_not_found() {
    let server = TestServer::seeded().await;
    let (status, body) = send(server.get("/api/auth/me").as_identity("stranger")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_me_falls_back_to_first_account() {
    let server = TestServer::seeded().await;
    let (status, me) = send(server.get("/api/auth/me")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["firebaseUid"], "demo-user-1");
}

#[tokio::test]
async fn test_strict_mode_requires_identity() {
    let server = TestServer::strict().await;
    let (status, _) = send(server.get("/api/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(server.post(
        "/api/questions",
        &study_helper_integration_tests::question_body("Anonymous?"),
    ))
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, me) = send(server.get("/api/auth/me").as_identity("demo-user-2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "Sarah Johnson");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = TestServer::empty().await;
    let response = server
        .get("/health")
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me");
    assert_eq!(response.text().await.unwrap(), "ok");
}
