//! Signup, login and current-user routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    extract::{AppJson, AuthUser},
    models::{
        student::Student,
        user::{AuthResponse, LoginRequest, NewUser, SignupRequest, User, UserResponse},
    },
    state::AppState,
    validation::{validate_email, validate_name, validate_password},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/me", get(me))
}

fn issue_token(state: &AppState, user: &User) -> ApiResult<String> {
    state.jwt_service.generate_token(user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::InternalServerError
    })
}

/// Register a user and their student profile
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    if !payload.has_all_fields() {
        return Err(ApiError::Validation(
            "Please provide all required fields".to_string(),
        ));
    }
    if payload.password != payload.confirm_password {
        return Err(ApiError::Validation("Passwords do not match".to_string()));
    }

    let email = payload.email.trim().to_lowercase();
    validate_name(&payload.name).map_err(ApiError::Validation)?;
    validate_email(&email).map_err(ApiError::Validation)?;
    validate_password(&payload.password).map_err(ApiError::Validation)?;

    if state.user_repository.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let user = state
        .user_repository
        .create(NewUser {
            name: payload.name,
            email,
            password: payload.password,
        })
        .await?;
    state.student_repository.create_for_user(&user).await?;
    info!("User registered: {}", user.id);

    let token = issue_token(&state, &user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            token,
            user: UserResponse::from(&user),
        }),
    ))
}

/// Exchange credentials for a token
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Please provide email and password".to_string(),
        ));
    }

    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());
    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(invalid)?;
    if !state
        .user_repository
        .verify_password(&user, &payload.password)?
    {
        info!("Failed login for {}", user.id);
        return Err(invalid());
    }

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse {
        success: true,
        token,
        user: UserResponse::from(&user),
    }))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserResponse,
    pub student: Option<Student>,
}

/// The verified caller with their student profile
pub async fn me(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Json<MeResponse>> {
    let user = state
        .user_repository
        .find_by_id(caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    let student = state.student_repository.find_by_user(caller.id).await?;

    Ok(Json(MeResponse {
        success: true,
        user: UserResponse::from(&user),
        student,
    }))
}
