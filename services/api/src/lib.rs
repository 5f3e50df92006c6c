//! Portfolio and academy REST API
//!
//! Accounts, student profiles, projects, skills, courses, blog posts and
//! portfolios over a document store, with in-app notifications pushed to
//! live WebSocket connections.

pub mod config;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod notifications;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use config::AppConfig;
pub use routes::create_router;
pub use state::AppState;
