//! Notification inbox; every route requires a bearer token

use axum::{
    Json, Router,
    extract::State,
    middleware,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    extract::{AppPath, AppQuery, AuthUser},
    middleware::auth_middleware,
    models::{
        ApiResponse, MessageResponse, Page,
        notification::{
            DEFAULT_NOTIFICATION_LIMIT, NotificationList, NotificationQuery, NotificationView,
        },
    },
    state::AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/read-all", put(mark_all_read))
        .route("/:id/read", put(mark_read))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Newest first, with the caller's unread total
pub async fn list_notifications(
    State(state): State<AppState>,
    caller: AuthUser,
    AppQuery(query): AppQuery<NotificationQuery>,
) -> ApiResult<Json<NotificationList>> {
    let page = Page::new(query.page, query.limit, DEFAULT_NOTIFICATION_LIMIT);
    let (notifications, total) = state
        .notification_repository
        .list_for(caller.id, page)
        .await?;
    let unread_count = state.notification_repository.unread_count(caller.id).await?;

    let people = state
        .user_repository
        .people(notifications.iter().filter_map(|n| n.sender))
        .await?;
    let data: Vec<NotificationView> = notifications
        .into_iter()
        .map(|n| {
            let sender = n.sender.and_then(|id| people.get(&id).cloned());
            NotificationView::new(n, sender)
        })
        .collect();

    Ok(Json(NotificationList {
        success: true,
        count: data.len(),
        total,
        page: page.page,
        pages: total.div_ceil(page.limit),
        unread_count,
        data,
    }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<NotificationView>>> {
    let notification = state
        .notification_repository
        .mark_read(id, caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification"))?;
    let sender = match notification.sender {
        Some(sender) => state.user_repository.person(sender).await?,
        None => None,
    };
    Ok(Json(ApiResponse::message(
        "Notification marked as read",
        NotificationView::new(notification, sender),
    )))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<MessageResponse>> {
    let updated = state.notification_repository.mark_all_read(caller.id).await?;
    tracing::debug!("Marked {} notifications read for {}", updated, caller.id);
    Ok(Json(MessageResponse::new("All notifications marked as read")))
}
