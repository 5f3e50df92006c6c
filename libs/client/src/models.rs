//! Response shapes the client decodes

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Result of signup or login
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub user: UserSummary,
    pub student: Option<serde_json::Value>,
}

/// `{success, message?, data}`
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// `{success, count, total, page, pages, data}`
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub count: usize,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub data: Vec<T>,
}

/// `{success, message}`
#[derive(Debug, Clone, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub likes: usize,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubdomainCheck {
    pub available: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient: Uuid,
    pub sender: Option<Person>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationInbox {
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub unread_count: u64,
    pub data: Vec<Notification>,
}
