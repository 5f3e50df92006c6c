//! Portfolio routes
//!
//! A user owns at most one portfolio, so the mutating routes address it
//! through the caller rather than by id.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    extract::{AppJson, AppPath, AppQuery, AuthUser, MaybeAuthUser},
    models::{
        ApiResponse, MessageResponse, Paginated, WithOwner,
        portfolio::{
            LayoutRequest, NewPortfolio, Portfolio, PortfolioQuery, SubdomainAvailability,
            ThemeRequest, UpdatePortfolio,
        },
    },
    routes::{with_owner, with_owners},
    state::AppState,
    validation::is_subdomain_charset,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_portfolios)
                .post(create_portfolio)
                .put(update_portfolio)
                .delete(delete_portfolio),
        )
        .route("/my", get(my_portfolio))
        .route("/check-subdomain/:subdomain", get(check_subdomain))
        .route("/theme", put(update_theme))
        .route("/layout", put(update_layout))
        .route("/subdomain/:subdomain", get(get_by_subdomain))
        .route("/:id", get(get_portfolio))
}

async fn owner_name(state: &AppState, caller: AuthUser) -> ApiResult<String> {
    let user = state
        .user_repository
        .find_by_id(caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(user.name)
}

fn portfolio_not_found() -> ApiError {
    ApiError::not_found("Portfolio")
}

pub async fn list_portfolios(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PortfolioQuery>,
) -> ApiResult<Json<Paginated<WithOwner<Portfolio>>>> {
    let (portfolios, total, page) = state.portfolio_repository.list(&query).await?;
    let data = with_owners(&state, portfolios, |p| p.user_id).await?;
    Ok(Json(Paginated::new(data, total, page)))
}

/// The caller's portfolio, created with defaults on first access
pub async fn my_portfolio(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ApiResponse<Portfolio>>> {
    let name = owner_name(&state, caller).await?;
    let portfolio = state
        .portfolio_repository
        .get_or_create(caller.id, &name)
        .await?;
    Ok(Json(ApiResponse::data(portfolio)))
}

pub async fn create_portfolio(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(request): AppJson<NewPortfolio>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Portfolio>>)> {
    let name = owner_name(&state, caller).await?;
    let portfolio = state
        .portfolio_repository
        .create(caller.id, &name, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message(
            "Portfolio created successfully",
            portfolio,
        )),
    ))
}

pub async fn update_portfolio(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(update): AppJson<UpdatePortfolio>,
) -> ApiResult<Json<ApiResponse<Portfolio>>> {
    let portfolio = state
        .portfolio_repository
        .update(caller.id, update)
        .await?
        .ok_or_else(portfolio_not_found)?;
    Ok(Json(ApiResponse::message(
        "Portfolio updated successfully",
        portfolio,
    )))
}

pub async fn update_theme(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(request): AppJson<ThemeRequest>,
) -> ApiResult<Json<ApiResponse<Portfolio>>> {
    let portfolio = state
        .portfolio_repository
        .update_theme(caller.id, request.theme)
        .await?
        .ok_or_else(portfolio_not_found)?;
    Ok(Json(ApiResponse::message(
        "Theme updated successfully",
        portfolio,
    )))
}

pub async fn update_layout(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(request): AppJson<LayoutRequest>,
) -> ApiResult<Json<ApiResponse<Portfolio>>> {
    let portfolio = state
        .portfolio_repository
        .update_layout(caller.id, request.layout)
        .await?
        .ok_or_else(portfolio_not_found)?;
    Ok(Json(ApiResponse::message(
        "Layout updated successfully",
        portfolio,
    )))
}

pub async fn delete_portfolio(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<MessageResponse>> {
    if !state.portfolio_repository.delete(caller.id).await? {
        return Err(portfolio_not_found());
    }
    Ok(Json(MessageResponse::new("Portfolio deleted successfully")))
}

pub async fn check_subdomain(
    State(state): State<AppState>,
    AppPath(subdomain): AppPath<String>,
) -> ApiResult<Json<SubdomainAvailability>> {
    if !is_subdomain_charset(&subdomain) {
        return Err(ApiError::Validation(
            "Subdomain can only contain lowercase letters, numbers, and hyphens".to_string(),
        ));
    }

    let available = !state.portfolio_repository.subdomain_taken(&subdomain).await?;
    let message = if available {
        "Subdomain is available"
    } else {
        "Subdomain is already taken"
    };
    Ok(Json(SubdomainAvailability {
        success: true,
        available,
        message: message.to_string(),
    }))
}

/// Public portfolios only
pub async fn get_by_subdomain(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    AppPath(subdomain): AppPath<String>,
) -> ApiResult<Json<ApiResponse<WithOwner<Portfolio>>>> {
    let portfolio = state
        .portfolio_repository
        .view_by_subdomain(&subdomain, viewer.id())
        .await?
        .ok_or_else(portfolio_not_found)?;
    let owner = portfolio.user_id;
    Ok(Json(ApiResponse::data(
        with_owner(&state, portfolio, owner).await?,
    )))
}

/// Private portfolios read as absent to everyone but their owner
pub async fn get_portfolio(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<WithOwner<Portfolio>>>> {
    let portfolio = state
        .portfolio_repository
        .view(id, viewer.id())
        .await?
        .ok_or_else(portfolio_not_found)?;
    let owner = portfolio.user_id;
    Ok(Json(ApiResponse::data(
        with_owner(&state, portfolio, owner).await?,
    )))
}
