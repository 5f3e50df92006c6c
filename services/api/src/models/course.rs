//! Courses, enrolments and reviews

use chrono::{DateTime, Utc};
use common::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{validate_length, validate_range};

vocabulary! {
    CourseCategory {
        WebDevelopment => "Web Development",
        MobileDevelopment => "Mobile Development",
        DataScience => "Data Science",
        AiMl => "AI/ML",
        DevOps => "DevOps",
        Design => "Design",
        Other => "Other",
    }
}

vocabulary! {
    CourseLevel {
        Beginner => "Beginner",
        Intermediate => "Intermediate",
        Advanced => "Advanced",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Minutes
    #[serde(default)]
    pub duration: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub average: f64,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user: Uuid,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub instructor: Uuid,
    pub category: CourseCategory,
    pub level: CourseLevel,
    /// Hours
    pub duration: i64,
    pub price: f64,
    pub thumbnail: Option<String>,
    pub syllabus: Vec<SyllabusItem>,
    pub prerequisites: Vec<String>,
    pub learning_outcomes: Vec<String>,
    pub enrolled_students: Vec<Uuid>,
    pub completed_students: Vec<Uuid>,
    pub rating: Rating,
    pub reviews: Vec<Review>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Course {
    const COLLECTION: &'static str = "courses";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Why an enrolment state change was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentError {
    AlreadyEnrolled,
    NotEnrolled,
    AlreadyCompleted,
    NotCompleted,
    AlreadyReviewed,
}

impl EnrollmentError {
    pub fn message(self) -> &'static str {
        match self {
            EnrollmentError::AlreadyEnrolled => "Already enrolled in this course",
            EnrollmentError::NotEnrolled => "Not enrolled in this course",
            EnrollmentError::AlreadyCompleted => "Course already completed",
            EnrollmentError::NotCompleted => "Must complete course before reviewing",
            EnrollmentError::AlreadyReviewed => "You have already reviewed this course",
        }
    }
}

impl Course {
    pub fn from_request(instructor: Uuid, request: NewCourse) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: request.title.trim().to_string(),
            description: request.description.trim().to_string(),
            instructor,
            category: request.category,
            level: request.level,
            duration: request.duration,
            price: request.price,
            thumbnail: request.thumbnail,
            syllabus: request.syllabus,
            prerequisites: request.prerequisites,
            learning_outcomes: request.learning_outcomes,
            enrolled_students: Vec::new(),
            completed_students: Vec::new(),
            rating: Rating::default(),
            reviews: Vec::new(),
            is_published: request.is_published,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_length("Title", &self.title, 5, Some(200))?;
        validate_length("Description", &self.description, 50, None)?;
        if self.duration < 1 {
            return Err("Duration must be at least 1 hour".to_string());
        }
        if self.price.is_nan() || self.price < 0.0 {
            return Err("Price cannot be negative".to_string());
        }
        if self.syllabus.iter().any(|item| item.title.trim().is_empty()) {
            return Err("Syllabus item title is required".to_string());
        }
        Ok(())
    }

    pub fn apply(&mut self, update: UpdateCourse) {
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(level) = update.level {
            self.level = level;
        }
        if let Some(duration) = update.duration {
            self.duration = duration;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if update.thumbnail.is_some() {
            self.thumbnail = update.thumbnail;
        }
        if let Some(syllabus) = update.syllabus {
            self.syllabus = syllabus;
        }
        if let Some(prerequisites) = update.prerequisites {
            self.prerequisites = prerequisites;
        }
        if let Some(outcomes) = update.learning_outcomes {
            self.learning_outcomes = outcomes;
        }
        if let Some(is_published) = update.is_published {
            self.is_published = is_published;
        }
        self.updated_at = Utc::now();
    }

    pub fn enroll(&mut self, student: Uuid) -> Result<(), EnrollmentError> {
        if self.enrolled_students.contains(&student) {
            return Err(EnrollmentError::AlreadyEnrolled);
        }
        self.enrolled_students.push(student);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn complete(&mut self, student: Uuid) -> Result<(), EnrollmentError> {
        if !self.enrolled_students.contains(&student) {
            return Err(EnrollmentError::NotEnrolled);
        }
        if self.completed_students.contains(&student) {
            return Err(EnrollmentError::AlreadyCompleted);
        }
        self.completed_students.push(student);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Append a review and recompute the rating
    pub fn add_review(
        &mut self,
        student: Uuid,
        rating: i64,
        comment: String,
    ) -> Result<&Review, EnrollmentError> {
        if !self.completed_students.contains(&student) {
            return Err(EnrollmentError::NotCompleted);
        }
        if self.reviews.iter().any(|review| review.user == student) {
            return Err(EnrollmentError::AlreadyReviewed);
        }

        let now = Utc::now();
        self.reviews.push(Review {
            id: Uuid::new_v4(),
            user: student,
            rating,
            comment,
            created_at: now,
        });
        self.recompute_rating();
        self.updated_at = now;
        Ok(&self.reviews[self.reviews.len() - 1])
    }

    fn recompute_rating(&mut self) {
        let count = self.reviews.len();
        let sum: i64 = self.reviews.iter().map(|review| review.rating).sum();
        self.rating = Rating {
            average: if count == 0 { 0.0 } else { sum as f64 / count as f64 },
            count: count as u32,
        };
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub category: CourseCategory,
    pub level: CourseLevel,
    pub duration: i64,
    #[serde(default)]
    pub price: f64,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub syllabus: Vec<SyllabusItem>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub learning_outcomes: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<CourseCategory>,
    pub level: Option<CourseLevel>,
    pub duration: Option<i64>,
    pub price: Option<f64>,
    pub thumbnail: Option<String>,
    pub syllabus: Option<Vec<SyllabusItem>>,
    pub prerequisites: Option<Vec<String>>,
    pub learning_outcomes: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

impl ReviewRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_range("Rating", self.rating, 1, 5)?;
        validate_length("Review comment", &self.comment, 10, Some(500))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseQuery {
    pub category: Option<CourseCategory>,
    pub level: Option<CourseLevel>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Which of the caller's courses to list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MyCoursesKind {
    #[default]
    Enrolled,
    Created,
    Completed,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MyCoursesQuery {
    #[serde(rename = "type", default)]
    pub kind: MyCoursesKind,
}
