//! Skill repository

use common::{Collection, DocumentStore, Filter, FindOptions, Sort, SortKey};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        DEFAULT_PAGE_LIMIT, Page,
        skill::{NewSkill, Skill, SkillCategory, SkillQuery, UpdateSkill},
    },
    repositories::{Owned, find_owned, find_page},
};

impl Owned for Skill {
    fn owner(&self) -> Uuid {
        self.user_id
    }
}

fn strongest_first() -> Vec<Sort> {
    vec![
        Sort::desc("percentage", SortKey::Number),
        Sort::asc("name", SortKey::Text),
    ]
}

#[derive(Clone)]
pub struct SkillRepository {
    skills: Collection<Skill>,
}

impl SkillRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            skills: store.collection(),
        }
    }

    pub async fn list(&self, query: &SkillQuery) -> ApiResult<(Vec<Skill>, u64, Page)> {
        let page = Page::new(query.page, query.limit, DEFAULT_PAGE_LIMIT);
        let filter = Filter::new()
            .when(query.category, |f, c| f.eq("category", c.as_str()))
            .when(query.level, |f, l| f.eq("level", l.as_str()))
            .when(query.user_id, |f, id| f.eq("userId", id.to_string()));

        let (skills, total) = find_page(&self.skills, &filter, strongest_first(), page).await?;
        Ok((skills, total, page))
    }

    pub async fn list_by_owner(&self, owner: Uuid) -> ApiResult<Vec<Skill>> {
        let filter = Filter::new().eq("userId", owner.to_string());
        let options = FindOptions::sorted(strongest_first());
        Ok(self.skills.find(&filter, &options).await?)
    }

    /// Categories in use across all skills, in vocabulary order
    pub async fn categories(&self) -> ApiResult<Vec<SkillCategory>> {
        let used = self.skills.distinct("category").await?;
        Ok(SkillCategory::ALL
            .iter()
            .copied()
            .filter(|c| used.iter().any(|u| u == c.as_str()))
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<Option<Skill>> {
        Ok(self.skills.get(id).await?)
    }

    pub async fn create(&self, owner: Uuid, request: NewSkill) -> ApiResult<Skill> {
        let skill = Skill::from_request(owner, request);
        skill.validate().map_err(ApiError::Validation)?;
        self.skills.insert(&skill).await?;
        Ok(skill)
    }

    pub async fn update(&self, id: Uuid, owner: Uuid, update: UpdateSkill) -> ApiResult<Option<Skill>> {
        let Some(mut skill) = find_owned(&self.skills, id, owner).await? else {
            return Ok(None);
        };
        skill.apply(update);
        skill.validate().map_err(ApiError::Validation)?;
        self.skills.replace(&skill).await?;
        Ok(Some(skill))
    }

    pub async fn delete(&self, id: Uuid, owner: Uuid) -> ApiResult<bool> {
        if find_owned(&self.skills, id, owner).await?.is_none() {
            return Ok(false);
        }
        Ok(self.skills.delete(id).await?)
    }
}
