//! Student profile repository

use chrono::Utc;
use common::{Collection, DocumentStore, Filter, Sort, SortKey};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        DEFAULT_PAGE_LIMIT, Page, split_list,
        student::{Student, StudentQuery, StudentStatus, UpdateStudent},
        user::{User, split_name},
    },
    repositories::find_page,
};

const SEARCH_FIELDS: &[&str] = &["firstName", "lastName", "bio", "skills"];

#[derive(Clone)]
pub struct StudentRepository {
    students: Collection<Student>,
}

impl StudentRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            students: store.collection(),
        }
    }

    /// Create the profile linked to a freshly registered user
    pub async fn create_for_user(&self, user: &User) -> ApiResult<Student> {
        let (first_name, last_name) = split_name(&user.name);
        let now = Utc::now();
        let student = Student {
            id: Uuid::new_v4(),
            user_id: user.id,
            first_name,
            last_name,
            email: user.email.clone(),
            phone: None,
            bio: String::new(),
            skills: Vec::new(),
            portfolio: None,
            github: None,
            linkedin: None,
            profile_image: None,
            enrolled_courses: Vec::new(),
            completed_courses: Vec::new(),
            gpa: 0.0,
            status: StudentStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.students.insert(&student).await?;
        info!("Created student profile {} for user {}", student.id, user.id);
        Ok(student)
    }

    pub async fn list(&self, query: &StudentQuery) -> ApiResult<(Vec<Student>, u64, Page)> {
        let page = Page::new(query.page, query.limit, DEFAULT_PAGE_LIMIT);
        let filter = Filter::new()
            .search(SEARCH_FIELDS, query.search.as_deref().unwrap_or_default())
            .when(query.skills.as_deref().map(split_list), |f, skills| {
                if skills.is_empty() { f } else { f.any_of("skills", skills) }
            })
            .when(query.status, |f, status| f.eq("status", status.as_str()));
        let sort = vec![Sort::desc("createdAt", SortKey::Timestamp)];

        let (students, total) = find_page(&self.students, &filter, sort, page).await?;
        Ok((students, total, page))
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<Option<Student>> {
        Ok(self.students.get(id).await?)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> ApiResult<Option<Student>> {
        let filter = Filter::new().eq("userId", user_id.to_string());
        Ok(self.students.find_one(&filter).await?)
    }

    /// Update the caller's own profile; None when they have none
    pub async fn update_for_user(
        &self,
        user_id: Uuid,
        update: UpdateStudent,
    ) -> ApiResult<Option<Student>> {
        let Some(mut student) = self.find_by_user(user_id).await? else {
            return Ok(None);
        };
        student.apply(update);
        student.validate().map_err(ApiError::Validation)?;
        self.students.replace(&student).await?;
        Ok(Some(student))
    }

    pub async fn delete(&self, id: Uuid) -> ApiResult<bool> {
        Ok(self.students.delete(id).await?)
    }

    pub async fn record_enrollment(&self, user_id: Uuid, course_id: Uuid) -> ApiResult<()> {
        self.record(user_id, |student| {
            if !student.enrolled_courses.contains(&course_id) {
                student.enrolled_courses.push(course_id);
            }
        })
        .await
    }

    pub async fn record_completion(&self, user_id: Uuid, course_id: Uuid) -> ApiResult<()> {
        self.record(user_id, |student| {
            if !student.completed_courses.contains(&course_id) {
                student.completed_courses.push(course_id);
            }
        })
        .await
    }

    /// Apply a course bookkeeping change; users without a profile are skipped
    async fn record(&self, user_id: Uuid, change: impl FnOnce(&mut Student)) -> ApiResult<()> {
        if let Some(mut student) = self.find_by_user(user_id).await? {
            change(&mut student);
            student.updated_at = Utc::now();
            self.students.replace(&student).await?;
        }
        Ok(())
    }
}
