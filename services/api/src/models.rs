//! API models: stored documents, request payloads and response envelopes

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a closed string vocabulary serialised by its display label
macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod blog;
pub mod course;
pub mod notification;
pub mod portfolio;
pub mod project;
pub mod skill;
pub mod student;
pub mod user;

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
}

impl Page {
    /// Page defaults to 1; limit to `default_limit`, clamped to 1..=100
    pub fn new(page: Option<u64>, limit: Option<u64>, default_limit: u64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_LIMIT),
        }
    }
}

/// List envelope: `{success, count, total, page, pages, data}`
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub success: bool,
    pub count: usize,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, page: Page) -> Self {
        Self {
            success: true,
            count: data.len(),
            total,
            page: page.page,
            pages: total.div_ceil(page.limit),
            data,
        }
    }
}

/// Single item envelope: `{success, message?, data}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Envelope for mutations without a payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Plain list envelope for distinct-value queries
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Public identity of a user, used wherever a reference is resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A document together with its resolved owner
#[derive(Debug, Clone, Serialize)]
pub struct WithOwner<T> {
    #[serde(flatten)]
    pub item: T,
    pub owner: Option<PersonRef>,
}

/// Result of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub likes: usize,
    pub is_liked: bool,
}

/// Split a comma separated query value into trimmed, non-empty items
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Flip membership of `id` in `set`; returns whether it is now a member
pub fn toggle_membership(set: &mut Vec<Uuid>, id: Uuid) -> bool {
    if let Some(index) = set.iter().position(|member| *member == id) {
        set.remove(index);
        false
    } else {
        set.push(id);
        true
    }
}
