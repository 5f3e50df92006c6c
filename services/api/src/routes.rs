//! HTTP routes
//!
//! Everything under `/api` is rate limited. Resource routers live in the
//! submodules; owner-scoped handlers take an [`AuthUser`] and answer with the
//! same 404 whether the document is absent or belongs to someone else.
//!
//! [`AuthUser`]: crate::extract::AuthUser

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use std::collections::HashMap;
use tower_http::cors::CorsLayer;
use tracing::warn;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::{ApiError, ApiResult},
    middleware::rate_limit_middleware,
    models::WithOwner,
    state::AppState,
};

pub mod auth;
pub mod blogs;
pub mod courses;
pub mod health;
pub mod notifications;
pub mod portfolios;
pub mod projects;
pub mod skills;
pub mod students;
pub mod ws;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health_check))
        .nest("/auth", auth::router())
        .nest("/students", students::router())
        .nest("/projects", projects::router())
        .nest("/skills", skills::router())
        .nest("/courses", courses::router())
        .nest("/blogs", blogs::router())
        .nest("/portfolios", portfolios::router())
        .nest("/notifications", notifications::router(state.clone()))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/", get(health::root))
        .route("/ws", get(ws::notifications_socket))
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(state.config.body_limit_bytes))
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match HeaderValue::from_str(&config.frontend_url) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!("Invalid FRONTEND_URL {:?}, cross-origin requests disabled: {}", config.frontend_url, e);
            layer
        }
    }
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Attach resolved owners to a batch of documents
pub(crate) async fn with_owners<T>(
    state: &AppState,
    items: Vec<T>,
    owner_of: impl Fn(&T) -> Uuid,
) -> ApiResult<Vec<WithOwner<T>>> {
    let people = state
        .user_repository
        .people(items.iter().map(&owner_of))
        .await?;
    Ok(attach(items, &people, owner_of))
}

fn attach<T>(
    items: Vec<T>,
    people: &HashMap<Uuid, crate::models::PersonRef>,
    owner_of: impl Fn(&T) -> Uuid,
) -> Vec<WithOwner<T>> {
    items
        .into_iter()
        .map(|item| {
            let owner = people.get(&owner_of(&item)).cloned();
            WithOwner { item, owner }
        })
        .collect()
}

/// Attach the resolved owner to one document
pub(crate) async fn with_owner<T>(state: &AppState, item: T, owner: Uuid) -> ApiResult<WithOwner<T>> {
    let owner = state.user_repository.person(owner).await?;
    Ok(WithOwner { item, owner })
}
