//! Shared harness for the router-level tests
#![allow(dead_code)]

use api::{AppConfig, AppState, create_router};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "Secret123";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

/// A signed-up user and their bearer token
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::for_tests())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::in_memory(config).expect("test state");
        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("valid request")).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    pub async fn signup(&self, name: &str, email: &str) -> TestUser {
        let (status, body) = self
            .post(
                "/api/auth/signup",
                None,
                json!({
                    "name": name,
                    "email": email,
                    "password": PASSWORD,
                    "confirmPassword": PASSWORD,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        TestUser {
            id: body["user"]["id"].as_str().expect("user id").parse().expect("uuid"),
            token: body["token"].as_str().expect("token").to_string(),
        }
    }

    /// Poll the inbox until `expected` notifications arrived
    pub async fn wait_for_notifications(&self, user: &TestUser, expected: u64) -> Value {
        for _ in 0..100 {
            let (status, body) = self.get("/api/notifications", Some(&user.token)).await;
            assert_eq!(status, StatusCode::OK);
            if body["total"].as_u64() >= Some(expected) {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {expected} notifications");
    }
}

pub fn project_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "A project used by the router tests",
        "technologies": ["Rust", "Axum"],
        "category": "Web Development",
    })
}

pub fn blog_body(title: &str, published: bool) -> Value {
    json!({
        "title": title,
        "content": "Rust ownership explained. ".repeat(8),
        "excerpt": "A short excerpt for the list view",
        "category": "Technology",
        "tags": ["rust", "backend"],
        "isPublished": published,
    })
}

pub fn course_body(title: &str, published: bool) -> Value {
    json!({
        "title": title,
        "description": "A hands-on course that walks through building web services in Rust.",
        "category": "Web Development",
        "level": "Beginner",
        "duration": 12,
        "price": 0.0,
        "isPublished": published,
    })
}
