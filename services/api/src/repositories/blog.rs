//! Blog repository: posts, likes and comment threads

use chrono::Utc;
use common::{Collection, DocumentStore, Filter, FindOptions, Sort, SortKey};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        DEFAULT_PAGE_LIMIT, LikeStatus, Page,
        blog::{Blog, BlogQuery, Comment, CommentRequest, NewBlog, Reply, UpdateBlog},
        split_list, toggle_membership,
    },
    repositories::{Owned, find_owned, find_page},
};

const SEARCH_FIELDS: &[&str] = &["title", "content", "excerpt", "tags"];

impl Owned for Blog {
    fn owner(&self) -> Uuid {
        self.author
    }
}

fn latest_first() -> Vec<Sort> {
    vec![
        Sort::desc("publishedAt", SortKey::Timestamp),
        Sort::desc("createdAt", SortKey::Timestamp),
    ]
}

/// Outcome of posting a reply
pub struct PostedReply {
    pub blog: Blog,
    pub comment_author: Uuid,
    pub reply: Reply,
}

#[derive(Clone)]
pub struct BlogRepository {
    blogs: Collection<Blog>,
}

impl BlogRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            blogs: store.collection(),
        }
    }

    /// Published posts only
    pub async fn list(&self, query: &BlogQuery) -> ApiResult<(Vec<Blog>, u64, Page)> {
        let page = Page::new(query.page, query.limit, DEFAULT_PAGE_LIMIT);
        let filter = Filter::new()
            .eq("isPublished", true)
            .when(query.category, |f, c| f.eq("category", c.as_str()))
            .when(query.featured, |f, featured| f.eq("isFeatured", featured))
            .when(query.tags.as_deref().map(split_list), |f, tags| {
                if tags.is_empty() { f } else { f.any_of("tags", tags) }
            })
            .search(SEARCH_FIELDS, query.search.as_deref().unwrap_or_default());

        let (blogs, total) = find_page(&self.blogs, &filter, latest_first(), page).await?;
        Ok((blogs, total, page))
    }

    pub async fn list_by_author(&self, author: Uuid) -> ApiResult<Vec<Blog>> {
        let filter = Filter::new().eq("author", author.to_string());
        let options = FindOptions::sorted(vec![Sort::desc("createdAt", SortKey::Timestamp)]);
        Ok(self.blogs.find(&filter, &options).await?)
    }

    /// Distinct categories across all posts, drafts included
    pub async fn categories(&self) -> ApiResult<Vec<String>> {
        Ok(self.blogs.distinct("category").await?)
    }

    /// Distinct tags across all posts, drafts included
    pub async fn tags(&self) -> ApiResult<Vec<String>> {
        Ok(self.blogs.distinct("tags").await?)
    }

    /// Fetch a post for `viewer` and count the view
    pub async fn view(&self, id: Uuid, viewer: Option<Uuid>) -> ApiResult<Option<Blog>> {
        let blog = self.blogs.get(id).await?;
        self.count_view(blog, viewer).await
    }

    pub async fn view_by_slug(&self, slug: &str, viewer: Option<Uuid>) -> ApiResult<Option<Blog>> {
        let blog = self.blogs.find_one(&Filter::new().eq("slug", slug)).await?;
        self.count_view(blog, viewer).await
    }

    async fn count_view(&self, blog: Option<Blog>, viewer: Option<Uuid>) -> ApiResult<Option<Blog>> {
        let Some(mut blog) = blog.filter(|b| b.is_visible_to(viewer)) else {
            return Ok(None);
        };
        blog.views += 1;
        blog.updated_at = Utc::now();
        self.blogs.replace(&blog).await?;
        Ok(Some(blog))
    }

    /// Published posts only; interactions on drafts are refused as not found
    async fn load_published(&self, id: Uuid) -> ApiResult<Blog> {
        self.blogs
            .get(id)
            .await?
            .filter(|b| b.is_published)
            .ok_or_else(|| ApiError::not_found("Blog post"))
    }

    pub async fn create(&self, author: Uuid, request: NewBlog) -> ApiResult<Blog> {
        let blog = Blog::from_request(author, request);
        blog.validate().map_err(ApiError::Validation)?;
        self.blogs.insert(&blog).await?;
        Ok(blog)
    }

    pub async fn update(&self, id: Uuid, author: Uuid, update: UpdateBlog) -> ApiResult<Option<Blog>> {
        let Some(mut blog) = find_owned(&self.blogs, id, author).await? else {
            return Ok(None);
        };
        blog.apply(update);
        blog.validate().map_err(ApiError::Validation)?;
        self.blogs.replace(&blog).await?;
        Ok(Some(blog))
    }

    pub async fn delete(&self, id: Uuid, author: Uuid) -> ApiResult<bool> {
        if find_owned(&self.blogs, id, author).await?.is_none() {
            return Ok(false);
        }
        Ok(self.blogs.delete(id).await?)
    }

    pub async fn toggle_like(&self, id: Uuid, user: Uuid) -> ApiResult<(Blog, LikeStatus)> {
        let mut blog = self.load_published(id).await?;
        let is_liked = toggle_membership(&mut blog.likes, user);
        blog.updated_at = Utc::now();
        self.blogs.replace(&blog).await?;

        let status = LikeStatus {
            likes: blog.likes.len(),
            is_liked,
        };
        Ok((blog, status))
    }

    pub async fn add_comment(
        &self,
        id: Uuid,
        user: Uuid,
        request: CommentRequest,
    ) -> ApiResult<(Blog, Comment)> {
        request.validate().map_err(ApiError::Validation)?;
        let mut blog = self.load_published(id).await?;

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            user,
            content: request.content.trim().to_string(),
            created_at: now,
            replies: Vec::new(),
        };
        blog.comments.push(comment.clone());
        blog.updated_at = now;
        self.blogs.replace(&blog).await?;
        Ok((blog, comment))
    }

    pub async fn add_reply(
        &self,
        id: Uuid,
        comment_id: Uuid,
        user: Uuid,
        request: CommentRequest,
    ) -> ApiResult<PostedReply> {
        request.validate().map_err(ApiError::Validation)?;
        let mut blog = self.load_published(id).await?;

        let now = Utc::now();
        let reply = Reply {
            id: Uuid::new_v4(),
            user,
            content: request.content.trim().to_string(),
            created_at: now,
        };
        let comment = blog
            .comment_mut(comment_id)
            .ok_or_else(|| ApiError::not_found("Comment"))?;
        comment.replies.push(reply.clone());
        let comment_author = comment.user;

        blog.updated_at = now;
        self.blogs.replace(&blog).await?;
        Ok(PostedReply {
            blog,
            comment_author,
            reply,
        })
    }
}
