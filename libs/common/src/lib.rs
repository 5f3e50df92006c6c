//! Common library for the portfolio platform
//!
//! This crate provides the persistence layer shared by the services: the
//! PostgreSQL connection pool and migrations, the document store with its
//! PostgreSQL and in-memory backends, and the database error type.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool, run_migrations};
//! use common::DocumentStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let store = DocumentStore::postgres(pool);
//!     println!("Store health check: {}", store.health_check().await?);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod store;

pub use error::{DatabaseError, DatabaseResult};
pub use store::{Collection, Document, DocumentStore, Filter, FindOptions, Sort, SortKey};
