mod common;

use axum::http::StatusCode;
use common::{PASSWORD, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_signup_creates_user_and_student_profile() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/auth/signup",
            None,
            json!({
                "name": "Jane Doe",
                "email": "Jane@Example.com",
                "password": PASSWORD,
                "confirmPassword": PASSWORD,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "jane@example.com");
    assert_eq!(body["user"]["role"], "student");
    assert!(body["user"].get("passwordHash").is_none());
    let token = body["token"].as_str().unwrap();

    let (status, me) = app.get("/api/auth/me", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["name"], "Jane Doe");
    assert_eq!(me["student"]["firstName"], "Jane");
    assert_eq!(me["student"]["lastName"], "Doe");
    assert_eq!(me["student"]["status"], "active");
}

#[tokio::test]
async fn test_signup_rejects_duplicate_email() {
    let app = TestApp::new();
    app.signup("Jane Doe", "jane@example.com").await;

    let (status, body) = app
        .post(
            "/api/auth/signup",
            None,
            json!({
                "name": "Other Jane",
                "email": "JANE@example.com",
                "password": PASSWORD,
                "confirmPassword": PASSWORD,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email already registered");
}

#[tokio::test]
async fn test_signup_validation_messages() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/auth/signup", None, json!({ "email": "a@b.co" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide all required fields");

    let (status, body) = app
        .post(
            "/api/auth/signup",
            None,
            json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "password": PASSWORD,
                "confirmPassword": "Different123",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Passwords do not match");

    let (status, body) = app
        .post(
            "/api/auth/signup",
            None,
            json!({
                "name": "Jane Doe",
                "email": "not-an-email",
                "password": PASSWORD,
                "confirmPassword": PASSWORD,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide a valid email");
}

#[tokio::test]
async fn test_login() {
    let app = TestApp::new();
    let jane = app.signup("Jane Doe", "jane@example.com").await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "jane@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], jane.id.to_string());

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "jane@example.com", "password": "Wrong1234" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, body) = app
        .post("/api/auth/login", None, json!({ "email": "jane@example.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide email and password");
}

#[tokio::test]
async fn test_me_requires_valid_token() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, no token");

    let (status, body) = app.get("/api/auth/me", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, token failed");
}
