//! Typed wrappers over every API route
//!
//! Documents are returned as JSON values; envelopes, auth results, like
//! toggles and notifications are decoded into the types in [`crate::models`].
//! Public catalogue reads go through the response cache.

use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    client::{ApiClient, Query},
    error::{ClientError, ClientResult},
    models::{
        Acknowledgement, AuthSession, CurrentUser, Envelope, LikeStatus, Listing, Notification,
        NotificationInbox, SubdomainCheck,
    },
    validation::{LoginForm, SignupForm, require},
};

/// Response carrying only a list under `data`
#[derive(Debug, serde::Deserialize)]
struct DataList<T> {
    data: Vec<T>,
}

impl ApiClient {
    // Auth

    pub async fn signup(&self, form: &SignupForm) -> ClientResult<AuthSession> {
        form.validate()?;
        let session: AuthSession = self.post("/auth/signup", form).await?;
        self.tokens().set(session.token.clone());
        Ok(session)
    }

    pub async fn login(&self, form: &LoginForm) -> ClientResult<AuthSession> {
        form.validate()?;
        let session: AuthSession = self.post("/auth/login", form).await?;
        self.tokens().set(session.token.clone());
        Ok(session)
    }

    /// Forget the token and every cached response
    pub async fn logout(&self) {
        self.tokens().clear();
        self.cache().clear().await;
    }

    pub async fn me(&self) -> ClientResult<CurrentUser> {
        self.get("/auth/me", &[]).await
    }

    // Students

    pub async fn list_students(&self, query: Query<'_>) -> ClientResult<Listing<Value>> {
        self.get_cached("/students", query).await
    }

    pub async fn search_students(&self, term: &str) -> ClientResult<Listing<Value>> {
        self.get("/students/search", &[("search", term)]).await
    }

    pub async fn my_student_profile(&self) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.get("/students/profile/me", &[]).await?;
        Ok(envelope.data)
    }

    pub async fn update_student_profile(&self, update: &Value) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.put("/students/profile/me", update).await?;
        Ok(envelope.data)
    }

    pub async fn get_student(&self, id: Uuid) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.get(&format!("/students/{id}"), &[]).await?;
        Ok(envelope.data)
    }

    pub async fn delete_student(&self, id: Uuid) -> ClientResult<Acknowledgement> {
        self.delete(&format!("/students/{id}")).await
    }

    // Projects

    pub async fn list_projects(&self, query: Query<'_>) -> ClientResult<Listing<Value>> {
        self.get_cached("/projects", query).await
    }

    pub async fn my_projects(&self) -> ClientResult<Vec<Value>> {
        let list: DataList<Value> = self.get("/projects/my", &[]).await?;
        Ok(list.data)
    }

    pub async fn get_project(&self, id: Uuid) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.get(&format!("/projects/{id}"), &[]).await?;
        Ok(envelope.data)
    }

    pub async fn create_project(&self, project: &Value) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.post("/projects", project).await?;
        Ok(envelope.data)
    }

    pub async fn update_project(&self, id: Uuid, update: &Value) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.put(&format!("/projects/{id}"), update).await?;
        Ok(envelope.data)
    }

    pub async fn delete_project(&self, id: Uuid) -> ClientResult<Acknowledgement> {
        self.delete(&format!("/projects/{id}")).await
    }

    pub async fn like_project(&self, id: Uuid) -> ClientResult<LikeStatus> {
        let envelope: Envelope<LikeStatus> =
            self.post(&format!("/projects/{id}/like"), &json!({})).await?;
        Ok(envelope.data)
    }

    // Skills

    pub async fn list_skills(&self, query: Query<'_>) -> ClientResult<Listing<Value>> {
        self.get_cached("/skills", query).await
    }

    pub async fn skill_categories(&self) -> ClientResult<Vec<String>> {
        let list: DataList<String> = self.get_cached("/skills/categories", &[]).await?;
        Ok(list.data)
    }

    pub async fn my_skills(&self) -> ClientResult<Vec<Value>> {
        let list: DataList<Value> = self.get("/skills/my", &[]).await?;
        Ok(list.data)
    }

    pub async fn get_skill(&self, id: Uuid) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.get(&format!("/skills/{id}"), &[]).await?;
        Ok(envelope.data)
    }

    pub async fn create_skill(&self, skill: &Value) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.post("/skills", skill).await?;
        Ok(envelope.data)
    }

    pub async fn update_skill(&self, id: Uuid, update: &Value) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.put(&format!("/skills/{id}"), update).await?;
        Ok(envelope.data)
    }

    pub async fn delete_skill(&self, id: Uuid) -> ClientResult<Acknowledgement> {
        self.delete(&format!("/skills/{id}")).await
    }

    // Courses

    pub async fn list_courses(&self, query: Query<'_>) -> ClientResult<Listing<Value>> {
        self.get_cached("/courses", query).await
    }

    /// `kind` is `enrolled`, `created` or `completed`
    pub async fn my_courses(&self, kind: &str) -> ClientResult<Vec<Value>> {
        let list: DataList<Value> = self.get("/courses/my", &[("type", kind)]).await?;
        Ok(list.data)
    }

    pub async fn get_course(&self, id: Uuid) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.get(&format!("/courses/{id}"), &[]).await?;
        Ok(envelope.data)
    }

    pub async fn create_course(&self, course: &Value) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.post("/courses", course).await?;
        Ok(envelope.data)
    }

    pub async fn update_course(&self, id: Uuid, update: &Value) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.put(&format!("/courses/{id}"), update).await?;
        Ok(envelope.data)
    }

    pub async fn delete_course(&self, id: Uuid) -> ClientResult<Acknowledgement> {
        self.delete(&format!("/courses/{id}")).await
    }

    pub async fn enroll(&self, id: Uuid) -> ClientResult<Value> {
        let envelope: Envelope<Value> =
            self.post(&format!("/courses/{id}/enroll"), &json!({})).await?;
        Ok(envelope.data)
    }

    pub async fn complete_course(&self, id: Uuid) -> ClientResult<Value> {
        let envelope: Envelope<Value> =
            self.post(&format!("/courses/{id}/complete"), &json!({})).await?;
        Ok(envelope.data)
    }

    pub async fn review_course(&self, id: Uuid, rating: u8, comment: &str) -> ClientResult<Value> {
        let body = json!({ "rating": rating, "comment": comment });
        let envelope: Envelope<Value> = self.post(&format!("/courses/{id}/review"), &body).await?;
        Ok(envelope.data)
    }

    // Blogs

    pub async fn list_blogs(&self, query: Query<'_>) -> ClientResult<Listing<Value>> {
        self.get_cached("/blogs", query).await
    }

    pub async fn blog_categories(&self) -> ClientResult<Vec<String>> {
        let list: DataList<String> = self.get_cached("/blogs/categories", &[]).await?;
        Ok(list.data)
    }

    pub async fn blog_tags(&self) -> ClientResult<Vec<String>> {
        let list: DataList<String> = self.get_cached("/blogs/tags", &[]).await?;
        Ok(list.data)
    }

    pub async fn my_blogs(&self) -> ClientResult<Vec<Value>> {
        let list: DataList<Value> = self.get("/blogs/my", &[]).await?;
        Ok(list.data)
    }

    pub async fn get_blog(&self, id: Uuid) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.get(&format!("/blogs/{id}"), &[]).await?;
        Ok(envelope.data)
    }

    pub async fn get_blog_by_slug(&self, slug: &str) -> ClientResult<Value> {
        require("Slug", slug)?;
        let envelope: Envelope<Value> = self.get(&format!("/blogs/slug/{slug}"), &[]).await?;
        Ok(envelope.data)
    }

    pub async fn create_blog(&self, blog: &Value) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.post("/blogs", blog).await?;
        Ok(envelope.data)
    }

    pub async fn update_blog(&self, id: Uuid, update: &Value) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.put(&format!("/blogs/{id}"), update).await?;
        Ok(envelope.data)
    }

    pub async fn delete_blog(&self, id: Uuid) -> ClientResult<Acknowledgement> {
        self.delete(&format!("/blogs/{id}")).await
    }

    pub async fn like_blog(&self, id: Uuid) -> ClientResult<LikeStatus> {
        let envelope: Envelope<LikeStatus> =
            self.post(&format!("/blogs/{id}/like"), &json!({})).await?;
        Ok(envelope.data)
    }

    pub async fn comment_on_blog(&self, id: Uuid, content: &str) -> ClientResult<Value> {
        require("Comment", content)?;
        let body = json!({ "content": content });
        let envelope: Envelope<Value> = self.post(&format!("/blogs/{id}/comments"), &body).await?;
        Ok(envelope.data)
    }

    pub async fn reply_to_comment(
        &self,
        id: Uuid,
        comment_id: Uuid,
        content: &str,
    ) -> ClientResult<Value> {
        require("Reply", content)?;
        let body = json!({ "content": content });
        let envelope: Envelope<Value> = self
            .post(&format!("/blogs/{id}/comments/{comment_id}/replies"), &body)
            .await?;
        Ok(envelope.data)
    }

    // Portfolios

    pub async fn list_portfolios(&self, query: Query<'_>) -> ClientResult<Listing<Value>> {
        self.get_cached("/portfolios", query).await
    }

    pub async fn my_portfolio(&self) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.get("/portfolios/my", &[]).await?;
        Ok(envelope.data)
    }

    pub async fn get_portfolio(&self, id: Uuid) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.get(&format!("/portfolios/{id}"), &[]).await?;
        Ok(envelope.data)
    }

    pub async fn portfolio_by_subdomain(&self, subdomain: &str) -> ClientResult<Value> {
        require("Subdomain", subdomain)?;
        let envelope: Envelope<Value> = self
            .get(&format!("/portfolios/subdomain/{subdomain}"), &[])
            .await?;
        Ok(envelope.data)
    }

    pub async fn create_portfolio(&self, portfolio: &Value) -> ClientResult<Value> {
        let has_title = portfolio
            .get("title")
            .and_then(Value::as_str)
            .is_some_and(|title| !title.trim().is_empty());
        if !has_title {
            return Err(ClientError::Validation("Title is required".to_string()));
        }
        let envelope: Envelope<Value> = self.post("/portfolios", portfolio).await?;
        Ok(envelope.data)
    }

    pub async fn update_portfolio(&self, update: &Value) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self.put("/portfolios", update).await?;
        Ok(envelope.data)
    }

    pub async fn delete_portfolio(&self) -> ClientResult<Acknowledgement> {
        self.delete("/portfolios").await
    }

    pub async fn check_subdomain(&self, subdomain: &str) -> ClientResult<SubdomainCheck> {
        require("Subdomain", subdomain)?;
        self.get(&format!("/portfolios/check-subdomain/{subdomain}"), &[])
            .await
    }

    pub async fn update_theme(&self, theme: &Value) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self
            .put("/portfolios/theme", &json!({ "theme": theme }))
            .await?;
        Ok(envelope.data)
    }

    pub async fn update_layout(&self, layout: &Value) -> ClientResult<Value> {
        let envelope: Envelope<Value> = self
            .put("/portfolios/layout", &json!({ "layout": layout }))
            .await?;
        Ok(envelope.data)
    }

    // Notifications

    pub async fn notifications(&self, page: u64, limit: u64) -> ClientResult<NotificationInbox> {
        let (page, limit) = (page.to_string(), limit.to_string());
        self.get(
            "/notifications",
            &[("page", page.as_str()), ("limit", limit.as_str())],
        )
        .await
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> ClientResult<Notification> {
        let envelope: Envelope<Notification> = self
            .put(&format!("/notifications/{id}/read"), &json!({}))
            .await?;
        Ok(envelope.data)
    }

    pub async fn mark_all_notifications_read(&self) -> ClientResult<Acknowledgement> {
        self.put("/notifications/read-all", &json!({})).await
    }
}
