//! Blog posts, likes and threaded comments

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    extract::{AppJson, AppPath, AppQuery, AuthUser, MaybeAuthUser},
    models::{
        ApiResponse, LikeStatus, ListResponse, MessageResponse, Paginated, PersonRef, WithOwner,
        blog::{
            Blog, BlogDetail, BlogQuery, BlogSummary, CommentRequest, CommentView, NewBlog,
            Reply, ReplyView, UpdateBlog,
        },
        notification::{NotificationIntent, NotificationType},
    },
    routes::with_owners,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs).post(create_blog))
        .route("/categories", get(blog_categories))
        .route("/tags", get(blog_tags))
        .route("/my", get(my_blogs))
        .route("/slug/:slug", get(get_blog_by_slug))
        .route("/:id", get(get_blog).put(update_blog).delete(delete_blog))
        .route("/:id/like", post(toggle_like))
        .route("/:id/comments", post(add_comment))
        .route("/:id/comments/:comment_id/replies", post(add_reply))
}

fn reply_view(reply: &Reply, people: &HashMap<Uuid, PersonRef>) -> ReplyView {
    ReplyView {
        id: reply.id,
        user: people.get(&reply.user).cloned(),
        content: reply.content.clone(),
        created_at: reply.created_at,
    }
}

/// Resolve the author and every commenter of a post in one lookup
async fn detail(state: &AppState, blog: Blog) -> ApiResult<WithOwner<BlogDetail>> {
    let mut ids = vec![blog.author];
    for comment in &blog.comments {
        ids.push(comment.user);
        ids.extend(comment.replies.iter().map(|reply| reply.user));
    }
    let people = state.user_repository.people(ids).await?;

    let comments = blog
        .comments
        .iter()
        .map(|comment| CommentView {
            id: comment.id,
            user: people.get(&comment.user).cloned(),
            content: comment.content.clone(),
            created_at: comment.created_at,
            replies: comment
                .replies
                .iter()
                .map(|reply| reply_view(reply, &people))
                .collect(),
        })
        .collect();

    let owner = people.get(&blog.author).cloned();
    Ok(WithOwner {
        item: BlogDetail {
            summary: BlogSummary::from(&blog),
            content: blog.content,
            seo_title: blog.seo_title,
            seo_description: blog.seo_description,
            comments,
        },
        owner,
    })
}

/// Published posts, newest first, without bodies
pub async fn list_blogs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<BlogQuery>,
) -> ApiResult<Json<Paginated<WithOwner<BlogSummary>>>> {
    let (blogs, total, page) = state.blog_repository.list(&query).await?;
    let summaries: Vec<BlogSummary> = blogs.iter().map(BlogSummary::from).collect();
    let data = with_owners(&state, summaries, |b| b.author).await?;
    Ok(Json(Paginated::new(data, total, page)))
}

pub async fn blog_categories(State(state): State<AppState>) -> ApiResult<Json<ListResponse<String>>> {
    Ok(Json(ListResponse::new(
        state.blog_repository.categories().await?,
    )))
}

pub async fn blog_tags(State(state): State<AppState>) -> ApiResult<Json<ListResponse<String>>> {
    Ok(Json(ListResponse::new(state.blog_repository.tags().await?)))
}

/// The caller's posts, drafts included
pub async fn my_blogs(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<ListResponse<BlogSummary>>> {
    let blogs = state.blog_repository.list_by_author(caller.id).await?;
    Ok(Json(ListResponse::new(
        blogs.iter().map(BlogSummary::from).collect(),
    )))
}

pub async fn get_blog(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<WithOwner<BlogDetail>>>> {
    let blog = state
        .blog_repository
        .view(id, viewer.id())
        .await?
        .ok_or_else(|| ApiError::not_found("Blog post"))?;
    Ok(Json(ApiResponse::data(detail(&state, blog).await?)))
}

pub async fn get_blog_by_slug(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    AppPath(slug): AppPath<String>,
) -> ApiResult<Json<ApiResponse<WithOwner<BlogDetail>>>> {
    let blog = state
        .blog_repository
        .view_by_slug(&slug, viewer.id())
        .await?
        .ok_or_else(|| ApiError::not_found("Blog post"))?;
    Ok(Json(ApiResponse::data(detail(&state, blog).await?)))
}

pub async fn create_blog(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(request): AppJson<NewBlog>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Blog>>)> {
    let blog = state.blog_repository.create(caller.id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Blog post created successfully", blog)),
    ))
}

pub async fn update_blog(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(update): AppJson<UpdateBlog>,
) -> ApiResult<Json<ApiResponse<Blog>>> {
    let blog = state
        .blog_repository
        .update(id, caller.id, update)
        .await?
        .ok_or_else(|| ApiError::not_owned("Blog post"))?;
    Ok(Json(ApiResponse::message("Blog post updated successfully", blog)))
}

pub async fn delete_blog(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.blog_repository.delete(id, caller.id).await? {
        return Err(ApiError::not_owned("Blog post"));
    }
    Ok(Json(MessageResponse::new("Blog post deleted successfully")))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<LikeStatus>>> {
    let (blog, status) = state.blog_repository.toggle_like(id, caller.id).await?;

    if status.is_liked {
        state.notifier.notify(NotificationIntent::new(
            blog.author,
            caller.id,
            NotificationType::Like,
            "New like on your post",
            format!("Someone liked your post \"{}\"", blog.title),
            format!("/blog/{}", blog.slug),
        ));
    }

    let message = if status.is_liked { "Post liked" } else { "Post unliked" };
    Ok(Json(ApiResponse::message(message, status)))
}

pub async fn add_comment(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<CommentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CommentView>>)> {
    let (blog, comment) = state
        .blog_repository
        .add_comment(id, caller.id, request)
        .await?;

    state.notifier.notify(NotificationIntent::new(
        blog.author,
        caller.id,
        NotificationType::Comment,
        "New comment on your post",
        format!("Someone commented on your post \"{}\"", blog.title),
        format!("/blog/{}", blog.slug),
    ));

    let user = state.user_repository.person(caller.id).await?;
    let view = CommentView {
        id: comment.id,
        user,
        content: comment.content,
        created_at: comment.created_at,
        replies: Vec::new(),
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Comment added successfully", view)),
    ))
}

pub async fn add_reply(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath((id, comment_id)): AppPath<(Uuid, Uuid)>,
    AppJson(request): AppJson<CommentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ReplyView>>)> {
    let posted = state
        .blog_repository
        .add_reply(id, comment_id, caller.id, request)
        .await?;

    state.notifier.notify(NotificationIntent::new(
        posted.comment_author,
        caller.id,
        NotificationType::Reply,
        "New reply to your comment",
        format!("Someone replied to your comment on \"{}\"", posted.blog.title),
        format!("/blog/{}", posted.blog.slug),
    ));

    let people = state.user_repository.people([caller.id]).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message(
            "Reply added successfully",
            reply_view(&posted.reply, &people),
        )),
    ))
}
