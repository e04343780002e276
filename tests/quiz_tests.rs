// tests/quiz_tests.rs

mod common;

use common::{spawn_app, unique_email};
use serde_json::json;

fn easy_submission() -> serde_json::Value {
    json!({
        "level": "easy",
        "score": 8,
        "total_questions": 10,
        "percentage": 80.0,
        "answers": [
            {"question": "1 + 1?", "selected_option": "2", "correct_option": "2", "is_correct": true},
            {"question": "2 * 3?", "selected_option": "5", "correct_option": "6", "is_correct": false}
        ],
        "time_spent": 120
    })
}

#[tokio::test]
async fn quiz_routes_require_a_bearer_token() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let submit = app
        .client
        .post(app.url("/quiz-results"))
        .json(&easy_submission())
        .send()
        .await
        .unwrap();
    let list = app.client.get(app.url("/quiz-results/me")).send().await.unwrap();
    let taken = app
        .client
        .get(app.url("/quiz-results/has-taken/easy"))
        .send()
        .await
        .unwrap();

    // Assert
    for response in [submit, list, taken] {
        assert_eq!(response.status().as_u16(), 401);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["kind"], "unauthorized");
    }
    assert_eq!(app.results.count().await, 0);
}

#[tokio::test]
async fn forged_token_is_rejected() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.get("eyJhbGciOiJIUzI1NiJ9.e30.invalid", "/quiz-results/me").await;

    // Assert
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn submit_returns_stored_record() {
    // Arrange
    let app = spawn_app().await;
    let token = app.signed_in_user(&unique_email("submit")).await;

    // Act
    let response = app.submit(&token, easy_submission()).await;

    // Assert
    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(uuid::Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    assert_eq!(body["level"], "easy");
    assert_eq!(body["score"], 8);
    assert_eq!(body["total_questions"], 10);
    assert_eq!(body["percentage"], 80.0);
    assert_eq!(body["time_spent"], 120);
    assert!(body["created_at"].is_string());
    assert!(body.get("answers").is_none());
}

#[tokio::test]
async fn each_submission_gets_a_fresh_id() {
    // Arrange
    let app = spawn_app().await;
    let token = app.signed_in_user(&unique_email("ids")).await;

    // Act
    let first: serde_json::Value = app.submit(&token, easy_submission()).await.json().await.unwrap();
    let second: serde_json::Value = app.submit(&token, easy_submission()).await.json().await.unwrap();

    // Assert
    assert_ne!(first["id"], second["id"]);
    assert_eq!(app.results.count().await, 2);
}

#[tokio::test]
async fn optional_fields_default_to_zero() {
    // Arrange
    let app = spawn_app().await;
    let token = app.signed_in_user(&unique_email("defaults")).await;

    // Act
    let response = app
        .submit(&token, json!({"level": "medium", "score": 4, "answers": []}))
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 201);
    let submitted: serde_json::Value = response.json().await.unwrap();
    assert_eq!(submitted["total_questions"], 0);
    assert_eq!(submitted["percentage"], 0.0);
    assert_eq!(submitted["time_spent"], 0);

    let listed: Vec<serde_json::Value> = app.get(&token, "/quiz-results/me").await.json().await.unwrap();
    assert_eq!(listed, vec![submitted]);
}

#[tokio::test]
async fn answers_are_not_cross_checked_against_score() {
    // Arrange
    let app = spawn_app().await;
    let token = app.signed_in_user(&unique_email("permissive")).await;

    // Act
    let response = app
        .submit(
            &token,
            json!({
                "level": "hard",
                "score": 10,
                "total_questions": 3,
                "answers": [
                    {"question": "q", "selected_option": "a", "is_correct": false}
                ]
            }),
        )
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn malformed_submission_is_rejected_before_storage() {
    // Arrange
    let app = spawn_app().await;
    let token = app.signed_in_user(&unique_email("invalid")).await;

    // Act
    let bad_range = app
        .submit(&token, json!({"level": "easy", "score": 1, "percentage": 150.0}))
        .await;
    let bad_type = app
        .submit(&token, json!({"level": "easy", "score": "eight"}))
        .await;

    // Assert
    assert_eq!(bad_range.status().as_u16(), 400);
    assert_eq!(bad_type.status().as_u16(), 400);
    assert_eq!(app.results.count().await, 0);
}

#[tokio::test]
async fn identity_without_user_row_is_not_found() {
    // Arrange
    let app = spawn_app().await;
    let email = unique_email("ghost");
    let token = app.signed_in_user(&email).await;
    app.users.remove(&email).await;

    // Act
    let submit = app.submit(&token, easy_submission()).await;
    let list = app.get(&token, "/quiz-results/me").await;
    let taken = app.get(&token, "/quiz-results/has-taken/easy").await;

    // Assert
    for response in [submit, list, taken] {
        assert_eq!(response.status().as_u16(), 404);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "User not found");
    }
    assert_eq!(app.results.count().await, 0);
}

#[tokio::test]
async fn storage_failure_is_bad_request_with_cause() {
    // Arrange
    let app = spawn_app().await;
    let token = app.signed_in_user(&unique_email("storage")).await;
    app.results.fail_inserts(true);

    // Act
    let response = app.submit(&token, easy_submission()).await;

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "persistence_error");
    assert!(body["detail"].as_str().unwrap().contains("foreign key"));
}

#[tokio::test]
async fn list_is_newest_first_and_scoped_to_owner() {
    // Arrange
    let app = spawn_app().await;
    let token = app.signed_in_user(&unique_email("owner")).await;
    let other = app.signed_in_user(&unique_email("other")).await;

    let mut submitted_ids = Vec::new();
    for (level, score) in [("easy", 8), ("medium", 6), ("hard", 3)] {
        let body: serde_json::Value = app
            .submit(&token, json!({"level": level, "score": score, "answers": []}))
            .await
            .json()
            .await
            .unwrap();
        submitted_ids.push(body["id"].clone());
    }
    app.submit(&other, easy_submission()).await;

    // Act
    let listed: Vec<serde_json::Value> = app.get(&token, "/quiz-results/me").await.json().await.unwrap();

    // Assert
    assert_eq!(listed.len(), 3);
    let listed_ids: Vec<serde_json::Value> = listed.iter().map(|r| r["id"].clone()).collect();
    submitted_ids.reverse();
    assert_eq!(listed_ids, submitted_ids);

    let timestamps: Vec<chrono::DateTime<chrono::Utc>> = listed
        .iter()
        .map(|r| r["created_at"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(timestamps.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn list_is_empty_before_any_submission() {
    // Arrange
    let app = spawn_app().await;
    let token = app.signed_in_user(&unique_email("empty")).await;

    // Act
    let listed: Vec<serde_json::Value> = app.get(&token, "/quiz-results/me").await.json().await.unwrap();

    // Assert
    assert!(listed.is_empty());
}

#[tokio::test]
async fn has_taken_flips_after_submission() {
    // Arrange
    let app = spawn_app().await;
    let token = app.signed_in_user(&unique_email("taken")).await;
    let before: bool = app.get(&token, "/quiz-results/has-taken/easy").await.json().await.unwrap();
    assert!(!before);

    // Act
    app.submit(&token, easy_submission()).await;

    // Assert
    let easy: bool = app.get(&token, "/quiz-results/has-taken/easy").await.json().await.unwrap();
    let hard: bool = app.get(&token, "/quiz-results/has-taken/hard").await.json().await.unwrap();
    assert!(easy);
    assert!(!hard);
}

#[tokio::test]
async fn has_taken_ignores_other_users() {
    // Arrange
    let app = spawn_app().await;
    let token = app.signed_in_user(&unique_email("mine")).await;
    let other = app.signed_in_user(&unique_email("theirs")).await;
    app.submit(&other, easy_submission()).await;

    // Act
    let taken: bool = app.get(&token, "/quiz-results/has-taken/easy").await.json().await.unwrap();

    // Assert
    assert!(!taken);
}
