//! Client errors, each carrying the message shown to the user

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    #[error("Request timeout. Please check your connection and try again.")]
    Timeout,

    #[error("Unable to reach the server. Please check your network and try again.")]
    Offline,

    /// The server refused the token; it has been cleared
    #[error("Session expired. Please login again.")]
    SessionExpired,

    #[error("You don't have permission to perform this action.")]
    Forbidden,

    #[error("Server error. Please try again later.")]
    Server { status: u16 },

    /// Any other non-success answer, with the server's message
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from the server: {0}")]
    Decode(String),

    #[error("Live connection failed: {0}")]
    Socket(String),

    #[error("Invalid client configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// HTTP status behind the error, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::SessionExpired => Some(401),
            ClientError::Forbidden => Some(403),
            ClientError::Server { status } | ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() || err.is_request() {
            ClientError::Offline
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Offline
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::Socket(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
