//! Personal portfolio sites

use chrono::{DateTime, Utc};
use common::Document;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{validate_length, validate_subdomain, validate_url};

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Hero,
    About,
    Skills,
    Projects,
    Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#6366f1".to_string(),
            secondary_color: "#f59e0b".to_string(),
            background_color: "#ffffff".to_string(),
            text_color: "#1f2937".to_string(),
            font_family: "Inter".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Layout {
    pub show_hero: bool,
    pub show_about: bool,
    pub show_skills: bool,
    pub show_projects: bool,
    pub show_contact: bool,
    pub sections_order: Vec<Section>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            show_hero: true,
            show_about: true,
            show_skills: true,
            show_projects: true,
            show_contact: true,
            sections_order: vec![
                Section::Hero,
                Section::About,
                Section::Skills,
                Section::Projects,
                Section::Contact,
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub url: String,
    pub filename: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Seo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub og_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Analytics {
    pub google_analytics_id: Option<String>,
    pub facebook_pixel_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub tagline: Option<String>,
    pub about: Option<String>,
    pub theme: Theme,
    pub layout: Layout,
    pub contact: Contact,
    pub resume: Option<Resume>,
    pub custom_domain: Option<String>,
    pub subdomain: String,
    pub is_public: bool,
    pub views: u64,
    pub last_viewed_at: Option<DateTime<Utc>>,
    pub seo: Seo,
    pub analytics: Option<Analytics>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Portfolio {
    const COLLECTION: &'static str = "portfolios";
    const UNIQUE_FIELDS: &'static [&'static str] = &["userId", "subdomain", "customDomain"];

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Subdomain derived from a display name plus a random 4-character base36 suffix
pub fn generate_subdomain(name: &str) -> String {
    let mut subdomain: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .take(26)
        .collect();
    let mut rng = rand::thread_rng();
    for _ in 0..4 {
        let index = rng.gen_range(0..SUFFIX_ALPHABET.len());
        subdomain.push(char::from(SUFFIX_ALPHABET[index]));
    }
    subdomain
}

impl Portfolio {
    /// Default portfolio for an owner without one
    pub fn default_for(owner: Uuid, owner_name: &str, subdomain: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            title: format!("{owner_name}'s Portfolio"),
            tagline: None,
            about: None,
            theme: Theme::default(),
            layout: Layout::default(),
            contact: Contact::default(),
            resume: None,
            custom_domain: None,
            subdomain,
            is_public: true,
            views: 0,
            last_viewed_at: None,
            seo: Seo::default(),
            analytics: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_request(owner: Uuid, subdomain: String, request: NewPortfolio) -> Self {
        let mut portfolio = Self::default_for(owner, "", subdomain);
        portfolio.title = request.title.trim().to_string();
        portfolio.tagline = request.tagline;
        portfolio.about = request.about;
        portfolio.theme = request.theme.unwrap_or_default();
        portfolio.layout = request.layout.unwrap_or_default();
        portfolio.contact = request.contact.unwrap_or_default();
        portfolio.resume = request.resume;
        portfolio.custom_domain = request.custom_domain;
        portfolio.is_public = request.is_public.unwrap_or(true);
        portfolio.seo = request.seo.unwrap_or_default();
        portfolio.analytics = request.analytics;
        portfolio
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_length("Title", &self.title, 3, Some(100))?;
        validate_subdomain(&self.subdomain)?;
        if let Some(tagline) = &self.tagline {
            validate_length("Tagline", tagline, 0, Some(200))?;
        }
        if let Some(about) = &self.about {
            validate_length("About", about, 0, Some(2000))?;
        }
        validate_url("website URL", self.contact.website.as_deref())?;
        if let Some(resume) = &self.resume {
            validate_url("resume URL", Some(&resume.url))?;
        }
        Ok(())
    }

    pub fn apply(&mut self, update: UpdatePortfolio) {
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if update.tagline.is_some() {
            self.tagline = update.tagline;
        }
        if update.about.is_some() {
            self.about = update.about;
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(layout) = update.layout {
            self.layout = layout;
        }
        if let Some(contact) = update.contact {
            self.contact = contact;
        }
        if update.resume.is_some() {
            self.resume = update.resume;
        }
        if update.custom_domain.is_some() {
            self.custom_domain = update.custom_domain;
        }
        if let Some(subdomain) = update.subdomain {
            self.subdomain = subdomain;
        }
        if let Some(is_public) = update.is_public {
            self.is_public = is_public;
        }
        if let Some(seo) = update.seo {
            self.seo = seo;
        }
        if update.analytics.is_some() {
            self.analytics = update.analytics;
        }
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn record_view(&mut self) {
        let now = Utc::now();
        self.views += 1;
        self.last_viewed_at = Some(now);
        self.updated_at = now;
    }

    /// Public portfolios are visible to everyone, private ones to their owner
    pub fn is_visible_to(&self, viewer: Option<Uuid>) -> bool {
        self.is_public || viewer == Some(self.user_id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    pub title: String,
    pub tagline: Option<String>,
    pub about: Option<String>,
    pub theme: Option<Theme>,
    pub layout: Option<Layout>,
    pub contact: Option<Contact>,
    pub resume: Option<Resume>,
    pub custom_domain: Option<String>,
    pub subdomain: Option<String>,
    pub is_public: Option<bool>,
    pub seo: Option<Seo>,
    pub analytics: Option<Analytics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePortfolio {
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub about: Option<String>,
    pub theme: Option<Theme>,
    pub layout: Option<Layout>,
    pub contact: Option<Contact>,
    pub resume: Option<Resume>,
    pub custom_domain: Option<String>,
    pub subdomain: Option<String>,
    pub is_public: Option<bool>,
    pub seo: Option<Seo>,
    pub analytics: Option<Analytics>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeRequest {
    pub theme: Theme,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutRequest {
    pub layout: Layout,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortfolioQuery {
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubdomainAvailability {
    pub success: bool,
    pub available: bool,
    pub message: String,
}
