//! Document store used by every resource service
//!
//! Documents are serde types stored as JSON, grouped in named collections.
//! Two backends share one set of semantics: PostgreSQL (JSONB, for
//! deployments) and memory (tests and local runs). Services talk to a typed
//! [`Collection`] obtained from [`DocumentStore::collection`].

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use sqlx::PgPool;
use std::marker::PhantomData;
use uuid::Uuid;

use crate::error::DatabaseResult;

pub mod filter;
pub mod memory;
pub mod postgres;

pub use filter::{Condition, Filter, FindOptions, Sort, SortKey, SortOrder};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// A type persisted as a JSON document
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection (table partition) name
    const COLLECTION: &'static str;

    /// Top-level fields whose non-null values must be unique in the collection
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> Uuid;
}

/// Backend-agnostic handle to the document store
#[derive(Debug, Clone)]
pub enum DocumentStore {
    Postgres(PostgresStore),
    Memory(MemoryStore),
}

impl DocumentStore {
    pub fn postgres(pool: PgPool) -> Self {
        DocumentStore::Postgres(PostgresStore::new(pool))
    }

    pub fn in_memory() -> Self {
        DocumentStore::Memory(MemoryStore::new())
    }

    /// Typed access to the collection of `T`
    pub fn collection<T: Document>(&self) -> Collection<T> {
        Collection {
            store: self.clone(),
            _marker: PhantomData,
        }
    }

    pub async fn health_check(&self) -> DatabaseResult<bool> {
        match self {
            DocumentStore::Postgres(pg) => crate::database::health_check(pg.pool()).await,
            DocumentStore::Memory(_) => Ok(true),
        }
    }
}

/// Typed view over one collection
#[derive(Debug)]
pub struct Collection<T> {
    store: DocumentStore,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

fn decode<T: Document>(body: Value) -> DatabaseResult<T> {
    Ok(serde_json::from_value(body)?)
}

impl<T: Document> Collection<T> {
    pub fn name(&self) -> &'static str {
        T::COLLECTION
    }

    pub async fn insert(&self, doc: &T) -> DatabaseResult<()> {
        let body = serde_json::to_value(doc)?;
        match &self.store {
            DocumentStore::Postgres(pg) => pg.insert(T::COLLECTION, doc.id(), body).await,
            DocumentStore::Memory(mem) => {
                mem.insert(T::COLLECTION, doc.id(), body, T::UNIQUE_FIELDS)
                    .await
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> DatabaseResult<Option<T>> {
        let body = match &self.store {
            DocumentStore::Postgres(pg) => pg.get(T::COLLECTION, id).await?,
            DocumentStore::Memory(mem) => mem.get(T::COLLECTION, id).await?,
        };
        body.map(decode).transpose()
    }

    /// Overwrite a stored document; returns false when it no longer exists
    pub async fn replace(&self, doc: &T) -> DatabaseResult<bool> {
        let body = serde_json::to_value(doc)?;
        match &self.store {
            DocumentStore::Postgres(pg) => pg.replace(T::COLLECTION, doc.id(), body).await,
            DocumentStore::Memory(mem) => {
                mem.replace(T::COLLECTION, doc.id(), body, T::UNIQUE_FIELDS)
                    .await
            }
        }
    }

    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        match &self.store {
            DocumentStore::Postgres(pg) => pg.delete(T::COLLECTION, id).await,
            DocumentStore::Memory(mem) => mem.delete(T::COLLECTION, id).await,
        }
    }

    pub async fn find(&self, filter: &Filter, options: &FindOptions) -> DatabaseResult<Vec<T>> {
        let bodies = match &self.store {
            DocumentStore::Postgres(pg) => pg.find(T::COLLECTION, filter, options).await?,
            DocumentStore::Memory(mem) => mem.find(T::COLLECTION, filter, options).await?,
        };
        bodies.into_iter().map(decode).collect()
    }

    pub async fn find_one(&self, filter: &Filter) -> DatabaseResult<Option<T>> {
        let options = FindOptions {
            limit: Some(1),
            ..FindOptions::default()
        };
        Ok(self.find(filter, &options).await?.into_iter().next())
    }

    pub async fn count(&self, filter: &Filter) -> DatabaseResult<u64> {
        match &self.store {
            DocumentStore::Postgres(pg) => pg.count(T::COLLECTION, filter).await,
            DocumentStore::Memory(mem) => mem.count(T::COLLECTION, filter).await,
        }
    }

    pub async fn exists(&self, filter: &Filter) -> DatabaseResult<bool> {
        Ok(self.find_one(filter).await?.is_some())
    }

    /// Sorted distinct string values of a field (array fields are flattened)
    pub async fn distinct(&self, field: &str) -> DatabaseResult<Vec<String>> {
        match &self.store {
            DocumentStore::Postgres(pg) => pg.distinct(T::COLLECTION, field).await,
            DocumentStore::Memory(mem) => mem.distinct(T::COLLECTION, field).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatabaseError;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Note {
        id: Uuid,
        slug: String,
        tags: Vec<String>,
        score: u32,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";
        const UNIQUE_FIELDS: &'static [&'static str] = &["slug"];

        fn id(&self) -> Uuid {
            self.id
        }
    }

    fn note(slug: &str, tags: &[&str], score: u32) -> Note {
        Note {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            score,
        }
    }

    #[tokio::test]
    async fn test_insert_get_replace_delete() -> DatabaseResult<()> {
        let notes = DocumentStore::in_memory().collection::<Note>();
        let mut first = note("first", &["a"], 1);
        notes.insert(&first).await?;

        assert_eq!(notes.get(first.id).await?, Some(first.clone()));

        first.score = 7;
        assert!(notes.replace(&first).await?);
        assert_eq!(notes.get(first.id).await?.map(|n| n.score), Some(7));

        assert!(notes.delete(first.id).await?);
        assert!(!notes.delete(first.id).await?);
        assert_eq!(notes.get(first.id).await?, None);
        assert!(!notes.replace(&first).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_unique_fields_rejected_on_insert_and_replace() -> DatabaseResult<()> {
        let notes = DocumentStore::in_memory().collection::<Note>();
        notes.insert(&note("taken", &[], 0)).await?;

        let err = notes.insert(&note("taken", &[], 0)).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(field) if field == "slug"));
        assert_eq!(notes.count(&Filter::new()).await?, 1);

        let mut other = note("free", &[], 0);
        notes.insert(&other).await?;
        other.slug = "taken".to_string();
        assert!(matches!(
            notes.replace(&other).await,
            Err(DatabaseError::Duplicate(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_find_sorts_and_pages() -> DatabaseResult<()> {
        let notes = DocumentStore::in_memory().collection::<Note>();
        for score in 1..=25 {
            notes
                .insert(&note(&format!("n{score}"), &["x"], score))
                .await?;
        }

        let options =
            FindOptions::sorted(vec![Sort::desc("score", SortKey::Number)]).page(2, 10);
        let page = notes.find(&Filter::new(), &options).await?;
        let scores: Vec<u32> = page.iter().map(|n| n.score).collect();
        assert_eq!(scores, (6..=15).rev().collect::<Vec<_>>());
        Ok(())
    }

    #[tokio::test]
    async fn test_distinct_flattens_arrays() -> DatabaseResult<()> {
        let notes = DocumentStore::in_memory().collection::<Note>();
        notes.insert(&note("a", &["rust", "web"], 0)).await?;
        notes.insert(&note("b", &["web", "db"], 0)).await?;

        assert_eq!(notes.distinct("tags").await?, ["db", "rust", "web"]);
        assert!(notes.distinct("missing").await?.is_empty());
        Ok(())
    }
}
