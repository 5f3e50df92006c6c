//! Blog posts with comments and replies

use chrono::{DateTime, Utc};
use common::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PersonRef;
use crate::validation::validate_length;

pub const WORDS_PER_MINUTE: usize = 200;

vocabulary! {
    BlogCategory {
        Technology => "Technology",
        Programming => "Programming",
        Career => "Career",
        Tutorial => "Tutorial",
        News => "News",
        Opinion => "Opinion",
        Other => "Other",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: Uuid,
    pub user: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub author: Uuid,
    pub category: BlogCategory,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    pub views: u64,
    pub likes: Vec<Uuid>,
    pub comments: Vec<Comment>,
    pub read_time: u64,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Blog {
    const COLLECTION: &'static str = "blogs";
    const UNIQUE_FIELDS: &'static [&'static str] = &["slug"];

    fn id(&self) -> Uuid {
        self.id
    }
}

/// URL slug: lowercase, ASCII letters, digits and spaces kept, spaces joined by `-`
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Reading time in minutes at 200 words per minute, rounded up
pub fn read_time(content: &str) -> u64 {
    content.split_whitespace().count().div_ceil(WORDS_PER_MINUTE) as u64
}

impl Blog {
    pub fn from_request(author: Uuid, request: NewBlog) -> Self {
        let now = Utc::now();
        let title = request.title.trim().to_string();
        let slug = request
            .slug
            .map(|s| slugify(&s))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&title));
        let mut blog = Self {
            id: Uuid::new_v4(),
            read_time: read_time(&request.content),
            title,
            slug,
            content: request.content,
            excerpt: request.excerpt.trim().to_string(),
            author,
            category: request.category,
            tags: request.tags,
            featured_image: request.featured_image,
            is_published: request.is_published,
            is_featured: request.is_featured,
            views: 0,
            likes: Vec::new(),
            comments: Vec::new(),
            seo_title: request.seo_title,
            seo_description: request.seo_description,
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        blog.stamp_publication();
        blog
    }

    /// `publishedAt` is set once, on first publication
    fn stamp_publication(&mut self) {
        if self.is_published && self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_length("Title", &self.title, 5, Some(200))?;
        if self.slug.is_empty() {
            return Err("Title must contain letters or numbers".to_string());
        }
        validate_length("Content", &self.content, 100, None)?;
        validate_length("Excerpt", &self.excerpt, 10, Some(300))?;
        Ok(())
    }

    pub fn apply(&mut self, update: UpdateBlog) {
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(slug) = update.slug {
            self.slug = slugify(&slug);
        }
        if let Some(content) = update.content {
            self.read_time = read_time(&content);
            self.content = content;
        }
        if let Some(excerpt) = update.excerpt {
            self.excerpt = excerpt.trim().to_string();
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if update.featured_image.is_some() {
            self.featured_image = update.featured_image;
        }
        if let Some(is_published) = update.is_published {
            self.is_published = is_published;
        }
        if let Some(is_featured) = update.is_featured {
            self.is_featured = is_featured;
        }
        if update.seo_title.is_some() {
            self.seo_title = update.seo_title;
        }
        if update.seo_description.is_some() {
            self.seo_description = update.seo_description;
        }
        self.stamp_publication();
        self.updated_at = Utc::now();
    }

    pub fn comment_mut(&mut self, comment_id: Uuid) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == comment_id)
    }

    /// Visible to everyone once published, to the author always
    pub fn is_visible_to(&self, viewer: Option<Uuid>) -> bool {
        self.is_published || viewer == Some(self.author)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlog {
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub excerpt: String,
    pub category: BlogCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlog {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<BlogCategory>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<String>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentRequest {
    pub content: String,
}

impl CommentRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.content.trim().is_empty() {
            return Err("Comment content is required".to_string());
        }
        validate_length("Comment", &self.content, 1, Some(1000))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogQuery {
    pub category: Option<BlogCategory>,
    /// Comma separated tags, any of which must match
    pub tags: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// List view of a post: no body, no comment thread
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub author: Uuid,
    pub category: BlogCategory,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    pub views: u64,
    pub likes: Vec<Uuid>,
    pub comment_count: usize,
    pub read_time: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Blog> for BlogSummary {
    fn from(blog: &Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title.clone(),
            slug: blog.slug.clone(),
            excerpt: blog.excerpt.clone(),
            author: blog.author,
            category: blog.category,
            tags: blog.tags.clone(),
            featured_image: blog.featured_image.clone(),
            is_published: blog.is_published,
            is_featured: blog.is_featured,
            views: blog.views,
            likes: blog.likes.clone(),
            comment_count: blog.comments.len(),
            read_time: blog.read_time,
            published_at: blog.published_at,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyView {
    pub id: Uuid,
    pub user: Option<PersonRef>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub user: Option<PersonRef>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub replies: Vec<ReplyView>,
}

/// Full post with its comment thread resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDetail {
    #[serde(flatten)]
    pub summary: BlogSummary,
    pub content: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub comments: Vec<CommentView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content: &str, published: bool) -> NewBlog {
        NewBlog {
            title: "Hello, World! Rust 2024".into(),
            slug: None,
            content: content.into(),
            excerpt: "A short excerpt".into(),
            category: BlogCategory::Technology,
            tags: vec!["rust".into()],
            featured_image: None,
            is_published: published,
            is_featured: false,
            seo_title: None,
            seo_description: None,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World! Rust 2024"), "hello-world-rust-2024");
        assert_eq!(slugify("  Spaces   everywhere "), "spaces-everywhere");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_read_time_rounds_up() {
        assert_eq!(read_time(""), 0);
        assert_eq!(read_time(&"word ".repeat(200)), 1);
        assert_eq!(read_time(&"word ".repeat(201)), 2);
    }

    #[test]
    fn test_read_time_recomputed_on_content_change() {
        let mut blog = Blog::from_request(Uuid::new_v4(), request(&"word ".repeat(150), false));
        assert_eq!(blog.read_time, 1);
        blog.apply(UpdateBlog {
            content: Some("word ".repeat(450)),
            ..UpdateBlog::default()
        });
        assert_eq!(blog.read_time, 3);
    }

    #[test]
    fn test_published_at_set_once() {
        let mut blog = Blog::from_request(Uuid::new_v4(), request(&"word ".repeat(50), false));
        assert!(blog.published_at.is_none());

        blog.apply(UpdateBlog {
            is_published: Some(true),
            ..UpdateBlog::default()
        });
        let first = blog.published_at;
        assert!(first.is_some());

        blog.apply(UpdateBlog {
            is_published: Some(false),
            ..UpdateBlog::default()
        });
        blog.apply(UpdateBlog {
            is_published: Some(true),
            ..UpdateBlog::default()
        });
        assert_eq!(blog.published_at, first);
    }

    #[test]
    fn test_comment_lookup() {
        let mut blog = Blog::from_request(Uuid::new_v4(), request("body", true));
        let comment = Comment {
            id: Uuid::new_v4(),
            user: Uuid::new_v4(),
            content: "Nice".into(),
            created_at: Utc::now(),
            replies: vec![],
        };
        let id = comment.id;
        blog.comments.push(comment);
        assert!(blog.comment_mut(id).is_some());
        assert!(blog.comment_mut(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_drafts_visible_to_author_only() {
        let author = Uuid::new_v4();
        let draft = Blog::from_request(author, request("body", false));
        assert!(draft.is_visible_to(Some(author)));
        assert!(!draft.is_visible_to(Some(Uuid::new_v4())));
        assert!(!draft.is_visible_to(None));
    }
}
