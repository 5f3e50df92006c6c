//! Client for the portfolio platform API
//!
//! [`ApiClient`] wraps the REST surface with bearer-token handling, a
//! short-lived response cache and an observable loading flag.
//! [`NotificationStream`] follows the live notification socket.
//!
//! ```rust,no_run
//! use client::{ApiClient, SignupForm};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), client::ClientError> {
//!     let api = ApiClient::new("http://localhost:10000")?;
//!     let session = api
//!         .signup(&SignupForm {
//!             name: "Jane Doe".into(),
//!             email: "jane@example.com".into(),
//!             password: "Secret123".into(),
//!             confirm_password: "Secret123".into(),
//!         })
//!         .await?;
//!     println!("Signed up as {}", session.user.name);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod models;
pub mod resources;
pub mod stream;
pub mod token;
pub mod tracker;
pub mod validation;

pub use cache::ResponseCache;
pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use models::*;
pub use stream::NotificationStream;
pub use token::TokenStore;
pub use tracker::RequestTracker;
pub use validation::{LoginForm, SignupForm};
