//! Integration tests for the persistence layer
//!
//! The memory backend is always exercised. The PostgreSQL backend runs the
//! same scenario when `DATABASE_URL` points at a reachable database.

use common::{
    DatabaseError, Document, DocumentStore, Filter, FindOptions, Sort, SortKey,
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    id: Uuid,
    slug: String,
    title: String,
    tags: Vec<String>,
    is_published: bool,
    published_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Document for Article {
    const COLLECTION: &'static str = "blogs";
    const UNIQUE_FIELDS: &'static [&'static str] = &["slug"];

    fn id(&self) -> Uuid {
        self.id
    }
}

fn article(slug: &str, title: &str, tags: &[&str], days_ago: Option<i64>) -> Article {
    Article {
        id: Uuid::new_v4(),
        slug: format!("{slug}-{}", Uuid::new_v4().simple()),
        title: title.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        is_published: days_ago.is_some(),
        published_at: days_ago.map(|d| chrono::Utc::now() - chrono::Duration::days(d)),
    }
}

async fn exercise_store(store: &DocumentStore) -> Result<(), Box<dyn std::error::Error>> {
    let articles = store.collection::<Article>();
    let marker = Uuid::new_v4().simple().to_string();

    let newest = article("newest", "Tokio deep dive", &[&marker, "rust"], Some(1));
    let older = article("older", "Serde tricks", &[&marker], Some(5));
    let draft = article("draft", "Unfinished tokio notes", &[&marker], None);
    for a in [&older, &draft, &newest] {
        articles.insert(a).await?;
    }

    let scope = Filter::new().any_of("tags", [marker.clone()]);
    let published = scope.clone().eq("isPublished", true);
    let sorted = FindOptions::sorted(vec![Sort::desc("publishedAt", SortKey::Timestamp)]);

    let found = articles.find(&published, &sorted).await?;
    let ids: Vec<Uuid> = found.iter().map(|a| a.id).collect();
    assert_eq!(ids, [newest.id, older.id]);

    let search = scope.clone().search(&["title"], "TOKIO");
    assert_eq!(articles.count(&search).await?, 2);

    let mut duplicate = article("dup", "Duplicate", &[&marker], None);
    duplicate.slug = newest.slug.clone();
    assert!(matches!(
        articles.insert(&duplicate).await,
        Err(DatabaseError::Duplicate(_))
    ));

    let tags = articles.distinct("tags").await?;
    assert!(tags.contains(&marker));

    for a in [&older, &draft, &newest] {
        assert!(articles.delete(a.id).await?);
    }
    assert_eq!(articles.count(&scope).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_memory_store_integration() -> Result<(), Box<dyn std::error::Error>> {
    exercise_store(&DocumentStore::in_memory()).await
}

/// Runs against PostgreSQL only when `DATABASE_URL` is set
#[tokio::test]
async fn test_postgres_store_integration() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("DATABASE_URL").is_err() {
        return Ok(());
    }

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    assert!(health_check(&pool).await?, "Database health check failed");
    run_migrations(&pool).await?;

    exercise_store(&DocumentStore::postgres(pool)).await
}
