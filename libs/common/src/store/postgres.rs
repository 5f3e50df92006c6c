//! PostgreSQL document store backend
//!
//! Every collection lives in the single `documents` table as JSONB. Filters
//! are pushed down as containment (`@>`), key-existence (`?|`) and `ILIKE`
//! predicates; unique keys are enforced by partial expression indexes.

use serde_json::{Map, Value};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::filter::{Condition, FindOptions, Filter, SortKey, SortOrder};
use crate::error::{DatabaseError, DatabaseResult};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

fn single_field(field: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(field.to_string(), value);
    Value::Object(map)
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_where(qb: &mut QueryBuilder<'_, Postgres>, collection: &str, filter: &Filter) {
    qb.push(" WHERE collection = ").push_bind(collection.to_string());

    for condition in filter.conditions() {
        match condition {
            Condition::Eq { field, value } => {
                qb.push(" AND body @> ")
                    .push_bind(single_field(field, value.clone()));
            }
            Condition::Contains { field, value } => {
                qb.push(" AND body @> ")
                    .push_bind(single_field(field, Value::Array(vec![value.clone()])));
            }
            Condition::AnyOf { field, values } => {
                qb.push(" AND (body -> ")
                    .push_bind(field.clone())
                    .push(") ?| ")
                    .push_bind(values.clone());
            }
            Condition::Search { fields, term } => {
                let pattern = escape_like(term);
                qb.push(" AND (");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    qb.push("(body ->> ")
                        .push_bind(field.clone())
                        .push(") ILIKE ")
                        .push_bind(pattern.clone());
                }
                qb.push(")");
            }
        }
    }
}

fn push_order(qb: &mut QueryBuilder<'_, Postgres>, options: &FindOptions) {
    if options.sort.is_empty() {
        return;
    }
    qb.push(" ORDER BY ");
    for (i, sort) in options.sort.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push("(body ->> ").push_bind(sort.field.clone()).push(")");
        match sort.key {
            SortKey::Text => {}
            SortKey::Number => {
                qb.push("::double precision");
            }
            SortKey::Timestamp => {
                qb.push("::timestamptz");
            }
        }
        match sort.order {
            SortOrder::Asc => qb.push(" ASC NULLS FIRST"),
            SortOrder::Desc => qb.push(" DESC NULLS LAST"),
        };
    }
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn insert(&self, collection: &str, id: Uuid, body: Value) -> DatabaseResult<()> {
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id)
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;
        Ok(())
    }

    pub async fn get(&self, collection: &str, id: Uuid) -> DatabaseResult<Option<Value>> {
        sqlx::query_scalar::<_, Value>(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    pub async fn replace(&self, collection: &str, id: Uuid, body: Value) -> DatabaseResult<bool> {
        let result =
            sqlx::query("UPDATE documents SET body = $3 WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .bind(body)
                .execute(&self.pool)
                .await
                .map_err(DatabaseError::from_query)?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, collection: &str, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> DatabaseResult<Vec<Value>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT body FROM documents");
        push_where(&mut qb, collection, filter);
        push_order(&mut qb, options);
        if let Some(limit) = options.limit {
            qb.push(" LIMIT ").push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        if options.skip > 0 {
            qb.push(" OFFSET ").push_bind(i64::try_from(options.skip).unwrap_or(i64::MAX));
        }

        qb.build_query_scalar::<Value>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    pub async fn count(&self, collection: &str, filter: &Filter) -> DatabaseResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents");
        push_where(&mut qb, collection, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;
        Ok(count.max(0) as u64)
    }

    pub async fn distinct(&self, collection: &str, field: &str) -> DatabaseResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT value
            FROM documents,
                 jsonb_array_elements_text(
                     CASE WHEN jsonb_typeof(body -> $2) = 'array'
                          THEN body -> $2
                          ELSE jsonb_build_array(body -> $2)
                     END
                 ) AS value
            WHERE collection = $1 AND body ? $2 AND value IS NOT NULL
            ORDER BY value
            "#,
        )
        .bind(collection)
        .bind(field)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }
}
