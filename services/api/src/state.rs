//! Application state shared across handlers

use anyhow::Result;
use common::DocumentStore;
use std::sync::Arc;

use crate::{
    config::AppConfig,
    jwt::{JwtConfig, JwtService},
    notifications::{NotificationDispatcher, NotificationHub, Notifier},
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::{
        BlogRepository, CourseRepository, NotificationRepository, PortfolioRepository,
        ProjectRepository, SkillRepository, StudentRepository, UserRepository,
    },
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: DocumentStore,
    pub jwt_service: JwtService,
    pub rate_limiter: RateLimiter,
    pub user_repository: UserRepository,
    pub student_repository: StudentRepository,
    pub project_repository: ProjectRepository,
    pub skill_repository: SkillRepository,
    pub course_repository: CourseRepository,
    pub blog_repository: BlogRepository,
    pub portfolio_repository: PortfolioRepository,
    pub notification_repository: NotificationRepository,
    pub notifier: Notifier,
    pub hub: NotificationHub,
}

impl AppState {
    /// Build the state and start the notification dispatcher
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: AppConfig, store: DocumentStore) -> Result<Self> {
        let jwt_service = JwtService::new(JwtConfig {
            secret: config.jwt_secret.clone(),
            expiry_seconds: config.jwt_expiry_seconds,
        })?;
        let rate_limiter = RateLimiter::new(RateLimiterConfig {
            max_requests: config.rate_limit_max_requests,
            window_seconds: config.rate_limit_window_seconds,
        });

        let user_repository = UserRepository::new(&store);
        let notification_repository = NotificationRepository::new(&store);
        let hub = NotificationHub::new();
        let notifier = NotificationDispatcher::new(
            notification_repository.clone(),
            user_repository.clone(),
            hub.clone(),
        )
        .spawn();

        Ok(Self {
            config: Arc::new(config),
            student_repository: StudentRepository::new(&store),
            project_repository: ProjectRepository::new(&store),
            skill_repository: SkillRepository::new(&store),
            course_repository: CourseRepository::new(&store),
            blog_repository: BlogRepository::new(&store),
            portfolio_repository: PortfolioRepository::new(&store),
            store,
            jwt_service,
            rate_limiter,
            user_repository,
            notification_repository,
            notifier,
            hub,
        })
    }

    /// State over a fresh in-memory store
    pub fn in_memory(config: AppConfig) -> Result<Self> {
        Self::new(config, DocumentStore::in_memory())
    }
}
