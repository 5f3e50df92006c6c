//! Portfolio repository, keyed by owner

use common::{Collection, DatabaseError, DocumentStore, Filter, Sort, SortKey};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        DEFAULT_PAGE_LIMIT, Page,
        portfolio::{
            Layout, NewPortfolio, Portfolio, PortfolioQuery, Theme, UpdatePortfolio,
            generate_subdomain,
        },
    },
    repositories::find_page,
};

const SEARCH_FIELDS: &[&str] = &["title", "tagline", "about"];

/// Attempts at drawing a free random subdomain
const SUBDOMAIN_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct PortfolioRepository {
    portfolios: Collection<Portfolio>,
}

impl PortfolioRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            portfolios: store.collection(),
        }
    }

    /// Public portfolios, analytics stripped
    pub async fn list(&self, query: &PortfolioQuery) -> ApiResult<(Vec<Portfolio>, u64, Page)> {
        let page = Page::new(query.page, query.limit, DEFAULT_PAGE_LIMIT);
        let filter = Filter::new()
            .eq("isPublic", true)
            .search(SEARCH_FIELDS, query.search.as_deref().unwrap_or_default());
        let sort = vec![Sort::desc("updatedAt", SortKey::Timestamp)];

        let (mut portfolios, total) = find_page(&self.portfolios, &filter, sort, page).await?;
        for portfolio in &mut portfolios {
            portfolio.analytics = None;
        }
        Ok((portfolios, total, page))
    }

    pub async fn find_by_owner(&self, owner: Uuid) -> ApiResult<Option<Portfolio>> {
        let filter = Filter::new().eq("userId", owner.to_string());
        Ok(self.portfolios.find_one(&filter).await?)
    }

    pub async fn subdomain_taken(&self, subdomain: &str) -> ApiResult<bool> {
        Ok(self
            .portfolios
            .exists(&Filter::new().eq("subdomain", subdomain))
            .await?)
    }

    async fn free_subdomain(&self, name: &str) -> ApiResult<String> {
        for _ in 0..SUBDOMAIN_ATTEMPTS {
            let candidate = generate_subdomain(name);
            if !self.subdomain_taken(&candidate).await? {
                return Ok(candidate);
            }
        }
        warn!("No free subdomain found for {}", name);
        Err(ApiError::Conflict(
            "Could not generate a unique subdomain".to_string(),
        ))
    }

    /// Record a view unless the viewer owns the portfolio
    async fn count_view(&self, mut portfolio: Portfolio, viewer: Option<Uuid>) -> ApiResult<Portfolio> {
        if viewer != Some(portfolio.user_id) {
            portfolio.record_view();
            self.portfolios.replace(&portfolio).await?;
        }
        Ok(portfolio)
    }

    /// Private portfolios are reported as absent to everyone but their owner
    pub async fn view(&self, id: Uuid, viewer: Option<Uuid>) -> ApiResult<Option<Portfolio>> {
        let Some(portfolio) = self.portfolios.get(id).await? else {
            return Ok(None);
        };
        if !portfolio.is_visible_to(viewer) {
            return Ok(None);
        }
        self.count_view(portfolio, viewer).await.map(Some)
    }

    pub async fn view_by_subdomain(
        &self,
        subdomain: &str,
        viewer: Option<Uuid>,
    ) -> ApiResult<Option<Portfolio>> {
        let filter = Filter::new()
            .eq("subdomain", subdomain)
            .eq("isPublic", true);
        let Some(portfolio) = self.portfolios.find_one(&filter).await? else {
            return Ok(None);
        };
        self.count_view(portfolio, viewer).await.map(Some)
    }

    /// The owner's portfolio, created with defaults on first access
    pub async fn get_or_create(&self, owner: Uuid, owner_name: &str) -> ApiResult<Portfolio> {
        if let Some(portfolio) = self.find_by_owner(owner).await? {
            return Ok(portfolio);
        }

        let subdomain = self.free_subdomain(owner_name).await?;
        let portfolio = Portfolio::default_for(owner, owner_name, subdomain);
        match self.portfolios.insert(&portfolio).await {
            Ok(()) => {
                info!("Created default portfolio {} for {}", portfolio.id, owner);
                Ok(portfolio)
            }
            // Lost a race with a concurrent first access
            Err(DatabaseError::Duplicate(field)) if field == "userId" => self
                .find_by_owner(owner)
                .await?
                .ok_or_else(|| ApiError::not_found("Portfolio")),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn create(
        &self,
        owner: Uuid,
        owner_name: &str,
        request: NewPortfolio,
    ) -> ApiResult<Portfolio> {
        if self.find_by_owner(owner).await?.is_some() {
            return Err(ApiError::Conflict(
                "Portfolio already exists. Use update instead.".to_string(),
            ));
        }

        let subdomain = match request.subdomain.clone().filter(|s| !s.trim().is_empty()) {
            Some(subdomain) => subdomain.trim().to_string(),
            None => self.free_subdomain(owner_name).await?,
        };
        let portfolio = Portfolio::from_request(owner, subdomain, request);
        portfolio.validate().map_err(ApiError::Validation)?;
        self.portfolios.insert(&portfolio).await?;
        Ok(portfolio)
    }

    pub async fn update(&self, owner: Uuid, update: UpdatePortfolio) -> ApiResult<Option<Portfolio>> {
        self.modify(owner, |portfolio| portfolio.apply(update)).await
    }

    pub async fn update_theme(&self, owner: Uuid, theme: Theme) -> ApiResult<Option<Portfolio>> {
        self.modify(owner, |portfolio| {
            portfolio.theme = theme;
            portfolio.touch();
        })
        .await
    }

    pub async fn update_layout(&self, owner: Uuid, layout: Layout) -> ApiResult<Option<Portfolio>> {
        self.modify(owner, |portfolio| {
            portfolio.layout = layout;
            portfolio.touch();
        })
        .await
    }

    async fn modify(
        &self,
        owner: Uuid,
        change: impl FnOnce(&mut Portfolio),
    ) -> ApiResult<Option<Portfolio>> {
        let Some(mut portfolio) = self.find_by_owner(owner).await? else {
            return Ok(None);
        };
        change(&mut portfolio);
        portfolio.validate().map_err(ApiError::Validation)?;
        self.portfolios.replace(&portfolio).await?;
        Ok(Some(portfolio))
    }

    pub async fn delete(&self, owner: Uuid) -> ApiResult<bool> {
        let Some(portfolio) = self.find_by_owner(owner).await? else {
            return Ok(false);
        };
        Ok(self.portfolios.delete(portfolio.id).await?)
    }
}
