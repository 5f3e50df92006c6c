//! Student directory and profile routes

use axum::{Json, Router, extract::State, routing::get};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    extract::{AppJson, AppPath, AppQuery, AuthUser},
    models::{
        ApiResponse, MessageResponse, Paginated, WithOwner,
        student::{Student, StudentQuery, UpdateStudent},
        user::Role,
    },
    routes::{with_owner, with_owners},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students))
        .route("/search", get(list_students))
        .route("/profile/me", get(my_profile).put(update_my_profile))
        .route("/:id", get(get_student).delete(delete_student))
}

/// List and search students
pub async fn list_students(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<StudentQuery>,
) -> ApiResult<Json<Paginated<WithOwner<Student>>>> {
    let (students, total, page) = state.student_repository.list(&query).await?;
    let data = with_owners(&state, students, |s| s.user_id).await?;
    Ok(Json(Paginated::new(data, total, page)))
}

pub async fn get_student(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<WithOwner<Student>>>> {
    let student = state
        .student_repository
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Student"))?;
    let owner = student.user_id;
    Ok(Json(ApiResponse::data(
        with_owner(&state, student, owner).await?,
    )))
}

pub async fn my_profile(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<WithOwner<Student>>>> {
    let student = state
        .student_repository
        .find_by_user(caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Student profile"))?;
    Ok(Json(ApiResponse::data(
        with_owner(&state, student, caller.id).await?,
    )))
}

pub async fn update_my_profile(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(update): AppJson<UpdateStudent>,
) -> ApiResult<Json<ApiResponse<Student>>> {
    let student = state
        .student_repository
        .update_for_user(caller.id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("Student profile"))?;
    Ok(Json(ApiResponse::message(
        "Profile updated successfully",
        student,
    )))
}

/// Admin only
pub async fn delete_student(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    caller.authorize(&[Role::Admin])?;
    if !state.student_repository.delete(id).await? {
        return Err(ApiError::not_found("Student"));
    }
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}
