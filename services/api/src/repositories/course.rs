//! Course repository: catalogue, enrolment and reviews

use chrono::Utc;
use common::{Collection, DocumentStore, Filter, FindOptions, Sort, SortKey};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        DEFAULT_PAGE_LIMIT, Page,
        course::{
            Course, CourseQuery, EnrollmentError, MyCoursesKind, NewCourse, ReviewRequest,
            UpdateCourse,
        },
    },
    repositories::{Owned, find_owned, find_page},
};

const SEARCH_FIELDS: &[&str] = &["title", "description", "prerequisites"];

impl Owned for Course {
    fn owner(&self) -> Uuid {
        self.instructor
    }
}

impl From<EnrollmentError> for ApiError {
    fn from(err: EnrollmentError) -> Self {
        ApiError::Validation(err.message().to_string())
    }
}

fn newest_first() -> Vec<Sort> {
    vec![Sort::desc("createdAt", SortKey::Timestamp)]
}

#[derive(Clone)]
pub struct CourseRepository {
    courses: Collection<Course>,
}

impl CourseRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            courses: store.collection(),
        }
    }

    /// Published courses only
    pub async fn list(&self, query: &CourseQuery) -> ApiResult<(Vec<Course>, u64, Page)> {
        let page = Page::new(query.page, query.limit, DEFAULT_PAGE_LIMIT);
        let filter = Filter::new()
            .eq("isPublished", true)
            .when(query.category, |f, c| f.eq("category", c.as_str()))
            .when(query.level, |f, l| f.eq("level", l.as_str()))
            .search(SEARCH_FIELDS, query.search.as_deref().unwrap_or_default());

        let (courses, total) = find_page(&self.courses, &filter, newest_first(), page).await?;
        Ok((courses, total, page))
    }

    pub async fn list_mine(&self, user: Uuid, kind: MyCoursesKind) -> ApiResult<Vec<Course>> {
        let id = user.to_string();
        let filter = match kind {
            MyCoursesKind::Enrolled => Filter::new().contains("enrolledStudents", id),
            MyCoursesKind::Completed => Filter::new().contains("completedStudents", id),
            MyCoursesKind::Created => Filter::new().eq("instructor", id),
        };
        let options = FindOptions::sorted(newest_first());
        Ok(self.courses.find(&filter, &options).await?)
    }

    /// A course as seen by `viewer`; drafts are visible to their instructor only
    pub async fn get_visible(&self, id: Uuid, viewer: Option<Uuid>) -> ApiResult<Option<Course>> {
        Ok(self
            .courses
            .get(id)
            .await?
            .filter(|course| course.is_published || viewer == Some(course.instructor)))
    }

    pub async fn create(&self, instructor: Uuid, request: NewCourse) -> ApiResult<Course> {
        let course = Course::from_request(instructor, request);
        course.validate().map_err(ApiError::Validation)?;
        self.courses.insert(&course).await?;
        Ok(course)
    }

    pub async fn update(
        &self,
        id: Uuid,
        instructor: Uuid,
        update: UpdateCourse,
    ) -> ApiResult<Option<Course>> {
        let Some(mut course) = find_owned(&self.courses, id, instructor).await? else {
            return Ok(None);
        };
        course.apply(update);
        course.validate().map_err(ApiError::Validation)?;
        self.courses.replace(&course).await?;
        Ok(Some(course))
    }

    pub async fn delete(&self, id: Uuid, instructor: Uuid) -> ApiResult<bool> {
        if find_owned(&self.courses, id, instructor).await?.is_none() {
            return Ok(false);
        }
        Ok(self.courses.delete(id).await?)
    }

    /// Load a course for an enrolment transition; drafts cannot be joined
    async fn load_for_student(&self, id: Uuid) -> ApiResult<Course> {
        self.courses
            .get(id)
            .await?
            .filter(|course| course.is_published)
            .ok_or_else(|| ApiError::not_found("Course"))
    }

    pub async fn enroll(&self, id: Uuid, student: Uuid) -> ApiResult<Course> {
        let mut course = self.load_for_student(id).await?;
        course.enroll(student)?;
        self.courses.replace(&course).await?;
        Ok(course)
    }

    pub async fn complete(&self, id: Uuid, student: Uuid) -> ApiResult<Course> {
        let mut course = self.load_for_student(id).await?;
        course.complete(student)?;
        self.courses.replace(&course).await?;
        Ok(course)
    }

    pub async fn add_review(
        &self,
        id: Uuid,
        student: Uuid,
        review: ReviewRequest,
    ) -> ApiResult<Course> {
        review.validate().map_err(ApiError::Validation)?;
        let mut course = self.load_for_student(id).await?;
        course.add_review(student, review.rating, review.comment.trim().to_string())?;
        course.updated_at = Utc::now();
        self.courses.replace(&course).await?;
        Ok(course)
    }
}
