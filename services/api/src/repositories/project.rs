//! Project repository

use chrono::Utc;
use common::{Collection, DocumentStore, Filter, FindOptions, Sort, SortKey};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        DEFAULT_PAGE_LIMIT, LikeStatus, Page,
        project::{NewProject, Project, ProjectQuery, UpdateProject},
        toggle_membership,
    },
    repositories::{Owned, find_owned, find_page},
};

const SEARCH_FIELDS: &[&str] = &["title", "description", "technologies"];

impl Owned for Project {
    fn owner(&self) -> Uuid {
        self.user_id
    }
}

fn newest_first() -> Vec<Sort> {
    vec![Sort::desc("createdAt", SortKey::Timestamp)]
}

#[derive(Clone)]
pub struct ProjectRepository {
    projects: Collection<Project>,
}

impl ProjectRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            projects: store.collection(),
        }
    }

    pub async fn list(&self, query: &ProjectQuery) -> ApiResult<(Vec<Project>, u64, Page)> {
        let page = Page::new(query.page, query.limit, DEFAULT_PAGE_LIMIT);
        let filter = Filter::new()
            .when(query.category, |f, c| f.eq("category", c.as_str()))
            .when(query.featured, |f, featured| f.eq("featured", featured))
            .search(SEARCH_FIELDS, query.search.as_deref().unwrap_or_default());

        let (projects, total) = find_page(&self.projects, &filter, newest_first(), page).await?;
        Ok((projects, total, page))
    }

    pub async fn list_by_owner(&self, owner: Uuid) -> ApiResult<Vec<Project>> {
        let filter = Filter::new().eq("userId", owner.to_string());
        let options = FindOptions::sorted(newest_first());
        Ok(self.projects.find(&filter, &options).await?)
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<Option<Project>> {
        Ok(self.projects.get(id).await?)
    }

    /// Fetch a project and count the view
    pub async fn view(&self, id: Uuid) -> ApiResult<Option<Project>> {
        let Some(mut project) = self.projects.get(id).await? else {
            return Ok(None);
        };
        project.views += 1;
        project.updated_at = Utc::now();
        self.projects.replace(&project).await?;
        Ok(Some(project))
    }

    pub async fn create(&self, owner: Uuid, request: NewProject) -> ApiResult<Project> {
        let project = Project::from_request(owner, request);
        project.validate().map_err(ApiError::Validation)?;
        self.projects.insert(&project).await?;
        Ok(project)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        update: UpdateProject,
    ) -> ApiResult<Option<Project>> {
        let Some(mut project) = find_owned(&self.projects, id, owner).await? else {
            return Ok(None);
        };
        project.apply(update);
        project.validate().map_err(ApiError::Validation)?;
        self.projects.replace(&project).await?;
        Ok(Some(project))
    }

    pub async fn delete(&self, id: Uuid, owner: Uuid) -> ApiResult<bool> {
        if find_owned(&self.projects, id, owner).await?.is_none() {
            return Ok(false);
        }
        Ok(self.projects.delete(id).await?)
    }

    /// Flip the user's like; returns the project and the resulting status
    pub async fn toggle_like(
        &self,
        id: Uuid,
        user: Uuid,
    ) -> ApiResult<Option<(Project, LikeStatus)>> {
        let Some(mut project) = self.projects.get(id).await? else {
            return Ok(None);
        };
        let is_liked = toggle_membership(&mut project.likes, user);
        project.updated_at = Utc::now();
        self.projects.replace(&project).await?;

        let status = LikeStatus {
            likes: project.likes.len(),
            is_liked,
        };
        Ok(Some((project, status)))
    }
}
