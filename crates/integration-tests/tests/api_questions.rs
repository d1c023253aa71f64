//! Integration tests for the question feed and question lifecycle.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use study_helper_integration_tests::{AsIdentity, TestServer, question_body, send};

fn ids(feed: &Value) -> Vec<String> {
    feed.as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_str().unwrap().to_owned())
        .collect()
}

// ============================================================================
// Feed
// ============================================================================

#[tokio::test]
async fn test_feed_defaults_to_newest() {
    let server = TestServer::seeded().await;
    let (status, feed) = send(server.get("/api/questions")).await;
    assert_eq!(status, StatusCode::OK);

    let subjects: Vec<_> = feed
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["subject"].as_str().unwrap())
        .collect();
    assert_eq!(subjects, vec!["Mathematics", "Physics", "Chemistry"]);
    assert_eq!(feed[0]["author"]["name"], "Sarah Johnson");
    assert_eq!(feed[1]["author"]["name"], "David Kim");
}

#[tokio::test]
async fn test_new_question_tops_newest_feed() {
    let server = TestServer::seeded().await;
    let (status, question) = send(server.post("/api/questions", &question_body("Fresh"))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, feed) = send(server.get("/api/questions?sortBy=newest")).await;
    assert_eq!(feed[0]["id"], question["id"]);
    assert_eq!(feed[0]["commentCount"], 0);
}

#[tokio::test]
async fn test_helpful_feed_is_non_increasing() {
    let server = TestServer::seeded().await;
    let (_, feed) = send(server.get("/api/questions?sortBy=helpful")).await;
    let likes: Vec<u64> = feed
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["likes"].as_u64().unwrap())
        .collect();
    assert!(likes.windows(2).all(|pair| pair[0] >= pair[1]));
    assert_eq!(likes.len(), 3);
}

#[tokio::test]
async fn test_unanswered_feed_drops_commented_questions() {
    let server = TestServer::seeded().await;
    let (_, feed) = send(server.get("/api/questions")).await;
    let target = feed[1]["id"].as_str().unwrap().to_owned();

    let (status, _) = send(server.post(
        &format!("/api/questions/{target}/comments"),
        &json!({ "content": "Draw a free-body diagram first." }),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, unanswered) = send(server.get("/api/questions?sortBy=unanswered")).await;
    let remaining = ids(&unanswered);
    assert_eq!(remaining.len(), 2);
    assert!(!remaining.contains(&target));
    assert!(
        unanswered
            .as_array()
            .unwrap()
            .iter()
            .all(|q| q["commentCount"] == 0)
    );
}

#[tokio::test]
async fn test_unknown_sort_means_newest() {
    let server = TestServer::seeded().await;
    let (_, newest) = send(server.get("/api/questions?sortBy=newest")).await;
    let (_, other) = send(server.get("/api/questions?sortBy=popular")).await;
    assert_eq!(ids(&newest), ids(&other));
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_uses_current_account_and_defaults() {
    let server = TestServer::seeded().await;
    let mut body = question_body("Who am I?");
    body["authorId"] = json!("ignored");
    let (status, question) =
        send(server.post("/api/questions", &body).as_identity("demo-user-3")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(question["solved"], false);
    assert_eq!(question["likes"], 0);
    assert_eq!(question["views"], 0);
    assert_eq!(question["images"], json!([]));

    let (_, me) = send(server.get("/api/auth/me").as_identity("demo-user-3")).await;
    assert_eq!(question["authorId"], me["id"]);
}

#[tokio::test]
async fn test_create_reports_every_invalid_field() {
    let server = TestServer::seeded().await;
    let (status, body) = send(server.post(
        "/api/questions",
        &json!({ "title": "", "subject": "Physics", "difficulty": "Extreme" }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid question data");
    let fields: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "content", "gradeLevel", "difficulty"]);

    let (_, feed) = send(server.get("/api/questions")).await;
    assert_eq!(feed.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_create_without_accounts() {
    let server = TestServer::empty().await;
    let (status, body) = send(server.post("/api/questions", &question_body("Lonely"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No users found");
}

// ============================================================================
// Detail & Update
// ============================================================================

#[tokio::test]
async fn test_detail_leaves_question_unchanged() {
    let server = TestServer::seeded().await;
    let (_, question) = send(server.post("/api/questions", &question_body("Watched"))).await;
    let id = question["id"].as_str().unwrap();

    send(server.get(&format!("/api/questions/{id}"))).await;
    let (status, detail) = send(server.get(&format!("/api/questions/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["views"], 0);
    assert_eq!(detail["author"]["firebaseUid"], "demo-user-1");

    let stored = server.store.questions().list().unwrap();
    let watched = stored.iter().find(|q| q.title == "Watched").unwrap();
    assert_eq!(watched.views, 0);
}

#[tokio::test]
async fn test_mistyped_counter_is_reported_as_field() {
    let server = TestServer::seeded().await;
    let (_, question) = send(server.post("/api/questions", &question_body("Counted"))).await;
    let id = question["id"].as_str().unwrap();

    let (status, body) =
        send(server.patch(&format!("/api/questions/{id}"), &json!({ "likes": -3 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid question data");
    assert_eq!(body["errors"][0]["field"], "likes");
}

#[tokio::test]
async fn test_feed_tolerates_repeated_sort() {
    let server = TestServer::seeded().await;
    let (status, feed) = send(server.get("/api/questions?sortBy=unanswered&sortBy=helpful")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_detail_unknown_is_not_found() {
    let server = TestServer::seeded().await;
    let missing = uuid::Uuid::new_v4();
    let (status, body) = send(server.get(&format!("/api/questions/{missing}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Question not found");

    let (status, _) = send(server.get("/api/questions/garbage")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_solved_changes_only_solved() {
    let server = TestServer::seeded().await;
    let (_, question) = send(server.post("/api/questions", &question_body("Solve me"))).await;
    let id = question["id"].as_str().unwrap();

    let (status, updated) =
        send(server.patch(&format!("/api/questions/{id}"), &json!({ "solved": true }))).await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = question.clone();
    expected["solved"] = json!(true);
    assert_eq!(updated, expected);
}

#[tokio::test]
async fn test_update_unknown_and_invalid() {
    let server = TestServer::seeded().await;
    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(
        server.patch(&format!("/api/questions/{missing}"), &json!({ "solved": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, question) = send(server.post("/api/questions", &question_body("Keep me"))).await;
    let id = question["id"].as_str().unwrap();
    let (status, body) = send(server.patch(
        &format!("/api/questions/{id}"),
        &json!({ "title": "   ", "likes": 99 }),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "title");

    let (_, detail) = send(server.get(&format!("/api/questions/{id}"))).await;
    assert_eq!(detail["likes"], 0);
    assert_eq!(detail["title"], "Keep me");
}

#[tokio::test]
async fn test_update_rejects_unknown_fields() {
    let server = TestServer::seeded().await;
    let (_, question) = send(server.post("/api/questions", &question_body("Strict"))).await;
    let id = question["id"].as_str().unwrap();
    let (status, _) = send(
        server.patch(&format!("/api/questions/{id}"), &json!({ "createdAt": "2020-01-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
