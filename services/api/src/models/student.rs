//! Student profiles

use chrono::{DateTime, Utc};
use common::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{validate_length, validate_range, validate_url};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    Graduated,
}

impl StudentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StudentStatus::Active => "active",
            StudentStatus::Inactive => "inactive",
            StudentStatus::Graduated => "graduated",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub bio: String,
    pub skills: Vec<String>,
    pub portfolio: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub profile_image: Option<String>,
    pub enrolled_courses: Vec<Uuid>,
    pub completed_courses: Vec<Uuid>,
    pub gpa: f64,
    pub status: StudentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Student {
    const COLLECTION: &'static str = "students";
    const UNIQUE_FIELDS: &'static [&'static str] = &["email"];

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Student {
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("First name is required".to_string());
        }
        if self.last_name.trim().is_empty() {
            return Err("Last name is required".to_string());
        }
        validate_length("Bio", &self.bio, 0, Some(500))?;
        validate_range("GPA", self.gpa, 0.0, 4.0)?;
        validate_url("portfolio URL", self.portfolio.as_deref())?;
        validate_url("GitHub URL", self.github.as_deref())?;
        validate_url("LinkedIn URL", self.linkedin.as_deref())?;
        Ok(())
    }

    pub fn apply(&mut self, update: UpdateStudent) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name.trim().to_string();
        }
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if let Some(skills) = update.skills {
            self.skills = skills;
        }
        if update.portfolio.is_some() {
            self.portfolio = update.portfolio;
        }
        if update.github.is_some() {
            self.github = update.github;
        }
        if update.linkedin.is_some() {
            self.linkedin = update.linkedin;
        }
        if update.profile_image.is_some() {
            self.profile_image = update.profile_image;
        }
        if let Some(gpa) = update.gpa {
            self.gpa = gpa;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// Profile update payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudent {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub portfolio: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub profile_image: Option<String>,
    pub gpa: Option<f64>,
    pub status: Option<StudentStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentQuery {
    pub search: Option<String>,
    /// Comma separated skill names, any of which must match
    pub skills: Option<String>,
    pub status: Option<StudentStatus>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}
