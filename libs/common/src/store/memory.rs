//! In-memory document store backend
//!
//! Used by tests and by `STORAGE=memory` deployments. Documents keep their
//! insertion order, so equal sort keys resolve to insertion order.

use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::filter::{FindOptions, Filter, compare_documents};
use crate::error::{DatabaseError, DatabaseResult};

type Collections = HashMap<String, Vec<(Uuid, Value)>>;

/// Shared in-memory collections
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

fn check_unique(
    docs: &[(Uuid, Value)],
    id: Uuid,
    body: &Value,
    unique: &[&str],
) -> DatabaseResult<()> {
    for field in unique {
        let Some(value) = body.get(*field).filter(|v| !v.is_null()) else {
            continue;
        };
        let taken = docs
            .iter()
            .any(|(other_id, other)| *other_id != id && other.get(*field) == Some(value));
        if taken {
            return Err(DatabaseError::Duplicate((*field).to_string()));
        }
    }
    Ok(())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(
        &self,
        collection: &str,
        id: Uuid,
        body: Value,
        unique: &[&str],
    ) -> DatabaseResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|(other_id, _)| *other_id == id) {
            return Err(DatabaseError::Duplicate("id".to_string()));
        }
        check_unique(docs, id, &body, unique)?;
        docs.push((id, body));
        Ok(())
    }

    pub async fn get(&self, collection: &str, id: Uuid) -> DatabaseResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| *doc_id == id)
                .map(|(_, body)| body.clone())
        }))
    }

    pub async fn replace(
        &self,
        collection: &str,
        id: Uuid,
        body: Value,
        unique: &[&str],
    ) -> DatabaseResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        check_unique(docs, id, &body, unique)?;
        match docs.iter_mut().find(|(doc_id, _)| *doc_id == id) {
            Some((_, existing)) => {
                *existing = body;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn delete(&self, collection: &str, id: Uuid) -> DatabaseResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|(doc_id, _)| *doc_id != id);
        Ok(docs.len() < before)
    }

    pub async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> DatabaseResult<Vec<Value>> {
        let collections = self.collections.read().await;
        let mut matched: Vec<Value> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, body)| filter.matches(body))
                    .map(|(_, body)| body.clone())
                    .collect()
            })
            .unwrap_or_default();

        if !options.sort.is_empty() {
            matched.sort_by(|a, b| compare_documents(a, b, &options.sort));
        }

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);
        Ok(matched.into_iter().skip(skip).take(limit).collect())
    }

    pub async fn count(&self, collection: &str, filter: &Filter) -> DatabaseResult<u64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|(_, body)| filter.matches(body)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    pub async fn distinct(&self, collection: &str, field: &str) -> DatabaseResult<Vec<String>> {
        let collections = self.collections.read().await;
        let mut values = BTreeSet::new();
        if let Some(docs) = collections.get(collection) {
            for (_, body) in docs {
                match body.get(field) {
                    Some(Value::String(s)) => {
                        values.insert(s.clone());
                    }
                    Some(Value::Array(items)) => {
                        values.extend(items.iter().filter_map(Value::as_str).map(str::to_string));
                    }
                    _ => {}
                }
            }
        }
        Ok(values.into_iter().collect())
    }
}
