//! Query descriptions shared by the store backends
//!
//! A [`Filter`] is a conjunction of [`Condition`]s over top-level document
//! fields. Backends either translate it to SQL or evaluate it in memory with
//! [`Filter::matches`]; both must agree on the semantics documented here.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::cmp::Ordering;

/// A single predicate over a top-level field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the given JSON value
    Eq { field: String, value: Value },
    /// Array field contains the given JSON value
    Contains { field: String, value: Value },
    /// Field (string, or array of strings) shares at least one value with the set
    AnyOf { field: String, values: Vec<String> },
    /// Case-insensitive substring match on any of the fields. Array fields
    /// match when one of their string elements contains the term.
    Search { fields: Vec<String>, term: String },
}

/// Conjunction of conditions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn contains(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Contains {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn any_of<I, S>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.push(Condition::AnyOf {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add a search condition; blank terms are ignored
    #[must_use]
    pub fn search(mut self, fields: &[&str], term: &str) -> Self {
        let term = term.trim();
        if !term.is_empty() {
            self.conditions.push(Condition::Search {
                fields: fields.iter().map(|f| f.to_string()).collect(),
                term: term.to_string(),
            });
        }
        self
    }

    /// Apply `f` only when `value` is present
    #[must_use]
    pub fn when<T>(self, value: Option<T>, f: impl FnOnce(Self, T) -> Self) -> Self {
        match value {
            Some(value) => f(self, value),
            None => self,
        }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluate the filter against a JSON document
    pub fn matches(&self, doc: &Value) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::Eq { field, value } => doc.get(field) == Some(value),
            Condition::Contains { field, value } => doc
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
            Condition::AnyOf { field, values } => match doc.get(field) {
                Some(Value::String(s)) => values.contains(s),
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|item| values.iter().any(|v| v == item)),
                _ => false,
            },
            Condition::Search { fields, term } => {
                let needle = term.to_lowercase();
                fields.iter().any(|field| match doc.get(field) {
                    Some(Value::String(s)) => s.to_lowercase().contains(&needle),
                    Some(Value::Array(items)) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|item| item.to_lowercase().contains(&needle)),
                    _ => false,
                })
            }
        })
    }
}

/// How a sort field is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Text,
    Number,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One sort criterion. Missing or null values order before everything else,
/// so they come last in descending order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub key: SortKey,
    pub order: SortOrder,
}

impl Sort {
    pub fn desc(field: &str, key: SortKey) -> Self {
        Self {
            field: field.to_string(),
            key,
            order: SortOrder::Desc,
        }
    }

    pub fn asc(field: &str, key: SortKey) -> Self {
        Self {
            field: field.to_string(),
            key,
            order: SortOrder::Asc,
        }
    }
}

/// Sorting and windowing applied after filtering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub sort: Vec<Sort>,
    pub skip: u64,
    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn sorted(sort: Vec<Sort>) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn page(mut self, page: u64, limit: u64) -> Self {
        self.skip = page.saturating_sub(1).saturating_mul(limit);
        self.limit = Some(limit);
        self
    }
}

fn timestamp(value: &Value) -> Option<DateTime<FixedOffset>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}

fn compare_field(a: Option<&Value>, b: Option<&Value>, key: SortKey) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match key {
            SortKey::Text => a.as_str().cmp(&b.as_str()),
            SortKey::Number => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .unwrap_or(Ordering::Equal),
            SortKey::Timestamp => timestamp(a).cmp(&timestamp(b)),
        },
    }
}

/// Compare two documents by a list of sort criteria
pub fn compare_documents(a: &Value, b: &Value, sort: &[Sort]) -> Ordering {
    for criterion in sort {
        let ordering = compare_field(a.get(&criterion.field), b.get(&criterion.field), criterion.key);
        let ordering = match criterion.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
