//! In-app notifications

use chrono::{DateTime, Utc};
use common::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PersonRef;

pub const DEFAULT_NOTIFICATION_LIMIT: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Like,
    Comment,
    Reply,
    Enrollment,
    Review,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient: Uuid,
    pub sender: Option<Uuid>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Notification {
    const COLLECTION: &'static str = "notifications";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Notification {
    pub fn from_intent(intent: NotificationIntent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            recipient: intent.recipient,
            sender: intent.sender,
            title: intent.title,
            message: intent.message,
            kind: intent.kind,
            link: intent.link,
            is_read: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reading is one-way; returns whether the flag changed
    pub fn mark_read(&mut self) -> bool {
        if self.is_read {
            return false;
        }
        self.is_read = true;
        self.updated_at = Utc::now();
        true
    }
}

/// A notification a resource service wants delivered
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationIntent {
    pub recipient: Uuid,
    pub sender: Option<Uuid>,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
}

impl NotificationIntent {
    pub fn new(
        recipient: Uuid,
        sender: Uuid,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            recipient,
            sender: Some(sender),
            kind,
            title: title.into(),
            message: message.into(),
            link: Some(link.into()),
        }
    }

    pub fn is_self_notification(&self) -> bool {
        self.sender == Some(self.recipient)
    }
}

/// Notification with its sender resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: Uuid,
    pub recipient: Uuid,
    pub sender: Option<PersonRef>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationView {
    pub fn new(notification: Notification, sender: Option<PersonRef>) -> Self {
        Self {
            id: notification.id,
            recipient: notification.recipient,
            sender,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            link: notification.link,
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    pub success: bool,
    pub count: usize,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub unread_count: u64,
    pub data: Vec<NotificationView>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}
