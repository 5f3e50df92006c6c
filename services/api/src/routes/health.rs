//! Service banner and health check

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use tracing::error;

use crate::state::AppState;

/// Static service description
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Portfolio Backend API",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "auth": "/api/auth",
            "students": "/api/students",
            "projects": "/api/projects",
            "skills": "/api/skills",
            "courses": "/api/courses",
            "blogs": "/api/blogs",
            "portfolios": "/api/portfolios",
            "notifications": "/api/notifications",
            "realtime": "/ws"
        }
    }))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.store.health_check().await {
        Ok(true) => "up",
        Ok(false) => "down",
        Err(e) => {
            error!("Store health check failed: {}", e);
            "down"
        }
    };

    Json(json!({
        "status": "Backend is running",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.config.app_env,
        "database": database,
    }))
}
