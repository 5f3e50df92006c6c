//! Portfolio projects

use chrono::{DateTime, Utc};
use common::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{validate_length, validate_url};

vocabulary! {
    ProjectCategory {
        WebDevelopment => "Web Development",
        MobileApp => "Mobile App",
        DesktopApp => "Desktop App",
        AiMl => "AI/ML",
        DataScience => "Data Science",
        GameDevelopment => "Game Development",
        Other => "Other",
    }
}

vocabulary! {
    ProjectStatus {
        InProgress => "In Progress",
        Completed => "Completed",
        Archived => "Archived",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub category: ProjectCategory,
    pub status: ProjectStatus,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub user_id: Uuid,
    pub likes: Vec<Uuid>,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Project {
    pub fn from_request(owner: Uuid, request: NewProject) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: request.title.trim().to_string(),
            description: request.description.trim().to_string(),
            technologies: request.technologies,
            category: request.category,
            status: request.status.unwrap_or(ProjectStatus::InProgress),
            github_url: request.github_url,
            live_url: request.live_url,
            image_url: request.image_url,
            featured: request.featured,
            user_id: owner,
            likes: Vec::new(),
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_length("Title", &self.title, 3, Some(100))?;
        validate_length("Description", &self.description, 10, Some(1000))?;
        if self.technologies.iter().all(|t| t.trim().is_empty()) {
            return Err("At least one technology is required".to_string());
        }
        validate_url("GitHub URL", self.github_url.as_deref())?;
        validate_url("live URL", self.live_url.as_deref())?;
        validate_url("image URL", self.image_url.as_deref())?;
        Ok(())
    }

    pub fn apply(&mut self, update: UpdateProject) {
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(technologies) = update.technologies {
            self.technologies = technologies;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if update.github_url.is_some() {
            self.github_url = update.github_url;
        }
        if update.live_url.is_some() {
            self.live_url = update.live_url;
        }
        if update.image_url.is_some() {
            self.image_url = update.image_url;
        }
        if let Some(featured) = update.featured {
            self.featured = featured;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub category: ProjectCategory,
    pub status: Option<ProjectStatus>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub category: Option<ProjectCategory>,
    pub status: Option<ProjectStatus>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectQuery {
    pub category: Option<ProjectCategory>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}
