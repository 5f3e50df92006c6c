//! Skills with proficiency levels

use chrono::{DateTime, Utc};
use common::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{validate_length, validate_range};

vocabulary! {
    SkillCategory {
        Frontend => "Frontend",
        Backend => "Backend",
        Database => "Database",
        DevOps => "DevOps",
        Mobile => "Mobile",
        Design => "Design",
        Other => "Other",
    }
}

vocabulary! {
    SkillLevel {
        Beginner => "Beginner",
        Intermediate => "Intermediate",
        Advanced => "Advanced",
        Expert => "Expert",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub issuer: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: SkillCategory,
    pub level: SkillLevel,
    pub percentage: i64,
    pub user_id: Uuid,
    pub years_of_experience: i64,
    pub certifications: Vec<Certification>,
    pub projects: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Skill {
    const COLLECTION: &'static str = "skills";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Skill {
    pub fn from_request(owner: Uuid, request: NewSkill) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            category: request.category,
            level: request.level,
            percentage: request.percentage,
            user_id: owner,
            years_of_experience: request.years_of_experience,
            certifications: request.certifications,
            projects: request.projects,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_length("Skill name", &self.name, 2, Some(50))?;
        validate_range("Percentage", self.percentage, 0, 100)?;
        validate_range("Years of experience", self.years_of_experience, 0, 50)?;
        if self.certifications.iter().any(|c| c.name.trim().is_empty()) {
            return Err("Certification name is required".to_string());
        }
        Ok(())
    }

    pub fn apply(&mut self, update: UpdateSkill) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(level) = update.level {
            self.level = level;
        }
        if let Some(percentage) = update.percentage {
            self.percentage = percentage;
        }
        if let Some(years) = update.years_of_experience {
            self.years_of_experience = years;
        }
        if let Some(certifications) = update.certifications {
            self.certifications = certifications;
        }
        if let Some(projects) = update.projects {
            self.projects = projects;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSkill {
    pub name: String,
    pub category: SkillCategory,
    pub level: SkillLevel,
    pub percentage: i64,
    #[serde(default)]
    pub years_of_experience: i64,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub projects: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSkill {
    pub name: Option<String>,
    pub category: Option<SkillCategory>,
    pub level: Option<SkillLevel>,
    pub percentage: Option<i64>,
    pub years_of_experience: Option<i64>,
    pub certifications: Option<Vec<Certification>>,
    pub projects: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillQuery {
    pub category: Option<SkillCategory>,
    pub level: Option<SkillLevel>,
    pub user_id: Option<Uuid>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}
