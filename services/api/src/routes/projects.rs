//! Project routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    extract::{AppJson, AppPath, AppQuery, AuthUser},
    models::{
        ApiResponse, LikeStatus, ListResponse, MessageResponse, Paginated, WithOwner,
        notification::{NotificationIntent, NotificationType},
        project::{NewProject, Project, ProjectQuery, UpdateProject},
    },
    routes::{with_owner, with_owners},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/my", get(my_projects))
        .route(
            "/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/:id/like", post(toggle_like))
}

pub async fn list_projects(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ProjectQuery>,
) -> ApiResult<Json<Paginated<WithOwner<Project>>>> {
    let (projects, total, page) = state.project_repository.list(&query).await?;
    let data = with_owners(&state, projects, |p| p.user_id).await?;
    Ok(Json(Paginated::new(data, total, page)))
}

pub async fn my_projects(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ListResponse<Project>>> {
    let projects = state.project_repository.list_by_owner(caller.id).await?;
    Ok(Json(ListResponse::new(projects)))
}

/// Fetch a project; counts as a view
pub async fn get_project(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<WithOwner<Project>>>> {
    let project = state
        .project_repository
        .view(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project"))?;
    let owner = project.user_id;
    Ok(Json(ApiResponse::data(
        with_owner(&state, project, owner).await?,
    )))
}

pub async fn create_project(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(request): AppJson<NewProject>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Project>>)> {
    let project = state.project_repository.create(caller.id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Project created successfully", project)),
    ))
}

pub async fn update_project(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(update): AppJson<UpdateProject>,
) -> ApiResult<Json<ApiResponse<Project>>> {
    let project = state
        .project_repository
        .update(id, caller.id, update)
        .await?
        .ok_or_else(|| ApiError::not_owned("Project"))?;
    Ok(Json(ApiResponse::message(
        "Project updated successfully",
        project,
    )))
}

pub async fn delete_project(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.project_repository.delete(id, caller.id).await? {
        return Err(ApiError::not_owned("Project"));
    }
    Ok(Json(MessageResponse::new("Project deleted successfully")))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<LikeStatus>>> {
    let (project, status) = state
        .project_repository
        .toggle_like(id, caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project"))?;

    if status.is_liked {
        state.notifier.notify(NotificationIntent::new(
            project.user_id,
            caller.id,
            NotificationType::Like,
            "New like on your project",
            format!("Someone liked your project \"{}\"", project.title),
            format!("/projects/{}", project.id),
        ));
    }

    let message = if status.is_liked {
        "Project liked"
    } else {
        "Project unliked"
    };
    Ok(Json(ApiResponse::message(message, status)))
}
