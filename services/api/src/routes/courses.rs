//! Course catalogue, enrolment and reviews

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    extract::{AppJson, AppPath, AppQuery, AuthUser, MaybeAuthUser},
    models::{
        ApiResponse, ListResponse, MessageResponse, Paginated, WithOwner,
        course::{Course, CourseQuery, MyCoursesQuery, NewCourse, ReviewRequest, UpdateCourse},
        notification::{NotificationIntent, NotificationType},
    },
    routes::{with_owner, with_owners},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/my", get(my_courses))
        .route(
            "/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/:id/enroll", post(enroll))
        .route("/:id/complete", post(complete))
        .route("/:id/review", post(review))
}

/// Published courses only
pub async fn list_courses(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CourseQuery>,
) -> ApiResult<Json<Paginated<WithOwner<Course>>>> {
    let (courses, total, page) = state.course_repository.list(&query).await?;
    let data = with_owners(&state, courses, |c| c.instructor).await?;
    Ok(Json(Paginated::new(data, total, page)))
}

/// `?type=enrolled|created|completed`
pub async fn my_courses(
    State(state): State<AppState>,
    caller: AuthUser,
    AppQuery(query): AppQuery<MyCoursesQuery>,
) -> ApiResult<Json<ListResponse<Course>>> {
    let courses = state
        .course_repository
        .list_mine(caller.id, query.kind)
        .await?;
    Ok(Json(ListResponse::new(courses)))
}

/// Drafts are visible to their instructor only
pub async fn get_course(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<WithOwner<Course>>>> {
    let course = state
        .course_repository
        .get_visible(id, viewer.id())
        .await?
        .ok_or_else(|| ApiError::not_found("Course"))?;
    let instructor = course.instructor;
    Ok(Json(ApiResponse::data(
        with_owner(&state, course, instructor).await?,
    )))
}

pub async fn create_course(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(request): AppJson<NewCourse>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Course>>)> {
    let course = state.course_repository.create(caller.id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Course created successfully", course)),
    ))
}

pub async fn update_course(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(update): AppJson<UpdateCourse>,
) -> ApiResult<Json<ApiResponse<Course>>> {
    let course = state
        .course_repository
        .update(id, caller.id, update)
        .await?
        .ok_or_else(|| ApiError::not_owned("Course"))?;
    Ok(Json(ApiResponse::message("Course updated successfully", course)))
}

pub async fn delete_course(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.course_repository.delete(id, caller.id).await? {
        return Err(ApiError::not_owned("Course"));
    }
    Ok(Json(MessageResponse::new("Course deleted successfully")))
}

pub async fn enroll(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<Course>>> {
    let course = state.course_repository.enroll(id, caller.id).await?;
    state
        .student_repository
        .record_enrollment(caller.id, course.id)
        .await?;

    state.notifier.notify(NotificationIntent::new(
        course.instructor,
        caller.id,
        NotificationType::Enrollment,
        "New enrollment",
        format!("A student enrolled in your course \"{}\"", course.title),
        format!("/courses/{}", course.id),
    ));

    Ok(Json(ApiResponse::message(
        "Successfully enrolled in course",
        course,
    )))
}

pub async fn complete(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<Course>>> {
    let course = state.course_repository.complete(id, caller.id).await?;
    state
        .student_repository
        .record_completion(caller.id, course.id)
        .await?;
    Ok(Json(ApiResponse::message(
        "Course marked as completed",
        course,
    )))
}

pub async fn review(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<ReviewRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Course>>)> {
    let rating = request.rating;
    let course = state
        .course_repository
        .add_review(id, caller.id, request)
        .await?;

    state.notifier.notify(NotificationIntent::new(
        course.instructor,
        caller.id,
        NotificationType::Review,
        "New review",
        format!("Your course \"{}\" received a {rating}-star review", course.title),
        format!("/courses/{}", course.id),
    ));

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Review added successfully", course)),
    ))
}
