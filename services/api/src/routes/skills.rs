//! Skill routes

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    extract::{AppJson, AppPath, AppQuery, AuthUser},
    models::{
        ApiResponse, ListResponse, MessageResponse, Paginated, WithOwner,
        skill::{NewSkill, Skill, SkillCategory, SkillQuery, UpdateSkill},
    },
    routes::{with_owner, with_owners},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_skills).post(create_skill))
        .route("/categories", get(skill_categories))
        .route("/my", get(my_skills))
        .route("/:id", get(get_skill).put(update_skill).delete(delete_skill))
}

pub async fn list_skills(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SkillQuery>,
) -> ApiResult<Json<Paginated<WithOwner<Skill>>>> {
    let (skills, total, page) = state.skill_repository.list(&query).await?;
    let data = with_owners(&state, skills, |s| s.user_id).await?;
    Ok(Json(Paginated::new(data, total, page)))
}

/// Categories in use, in vocabulary order
pub async fn skill_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<ListResponse<SkillCategory>>> {
    Ok(Json(ListResponse::new(
        state.skill_repository.categories().await?,
    )))
}

pub async fn my_skills(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ListResponse<Skill>>> {
    Ok(Json(ListResponse::new(
        state.skill_repository.list_by_owner(caller.id).await?,
    )))
}

pub async fn get_skill(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<WithOwner<Skill>>>> {
    let skill = state
        .skill_repository
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Skill"))?;
    let owner = skill.user_id;
    Ok(Json(ApiResponse::data(with_owner(&state, skill, owner).await?)))
}

pub async fn create_skill(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(request): AppJson<NewSkill>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Skill>>)> {
    let skill = state.skill_repository.create(caller.id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Skill created successfully", skill)),
    ))
}

pub async fn update_skill(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(update): AppJson<UpdateSkill>,
) -> ApiResult<Json<ApiResponse<Skill>>> {
    let skill = state
        .skill_repository
        .update(id, caller.id, update)
        .await?
        .ok_or_else(|| ApiError::not_owned("Skill"))?;
    Ok(Json(ApiResponse::message("Skill updated successfully", skill)))
}

pub async fn delete_skill(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.skill_repository.delete(id, caller.id).await? {
        return Err(ApiError::not_owned("Skill"));
    }
    Ok(Json(MessageResponse::new("Skill deleted successfully")))
}
