//! Materialized, typed result sets for list-shaped responses.
//!
//! # Design
//! A result set is built in one go from a decoded payload: either every item
//! resolves through one declared kind, or (batch search) each item resolves
//! through its own `type` field. Construction is all-or-nothing; the first
//! item that fails to resolve fails the whole set.

use serde::Deserialize;
use serde_json::Value;

use crate::entity::Entity;
use crate::error::{ClientError, Result};
use crate::query::Query;
use crate::registry::Registry;

/// Pagination metadata attached to list payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Paging {
    pub total_items: Option<u64>,
    pub number_of_pages: Option<u32>,
    pub current_page: Option<u32>,
    pub items_per_page: Option<u32>,
    pub sort_order: Option<String>,
    pub next_page_url: Option<String>,
    pub prev_page_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    query: Query,
    kind: Option<String>,
    paging: Option<Paging>,
    items: Vec<Entity>,
}

impl ResultSet {
    /// Resolve `payload` into a result set.
    ///
    /// With `kind` set every item resolves as that kind; without it each item
    /// must carry its own `type`. `payload` may be null, an array of items,
    /// or an object with `items` and optional `paging`.
    pub fn new(query: Query, payload: &Value, kind: Option<&str>, registry: &Registry) -> Result<Self> {
        let (items, paging) = split_payload(payload)?;

        if let Some(kind) = kind {
            if !registry.is_registered(kind) {
                return Err(ClientError::UnsupportedEntity(kind.to_string()));
            }
        }

        let items = items
            .iter()
            .map(|item| match kind {
                Some(kind) => registry.resolve(kind, item),
                None => registry.resolve_typed(item),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            query,
            kind: kind.map(str::to_string),
            paging,
            items,
        })
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The declared kind, or `None` for a heterogeneous set.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn paging(&self) -> Option<&Paging> {
        self.paging.as_ref()
    }

    pub fn items(&self) -> &[Entity] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.items.iter()
    }

    /// The query for the following page, when paging says there is one.
    pub fn next_page_query(&self) -> Option<Query> {
        let paging = self.paging.as_ref()?;
        let current = paging.current_page?;
        let pages = paging.number_of_pages?;
        (current < pages).then(|| self.query.with_page(current + 1))
    }
}

impl IntoIterator for ResultSet {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn split_payload(payload: &Value) -> Result<(&[Value], Option<Paging>)> {
    match payload {
        Value::Null => Ok((&[], None)),
        Value::Array(items) => Ok((items.as_slice(), None)),
        Value::Object(map) => {
            let paging = match map.get("paging") {
                Some(Value::Null) | None => None,
                Some(raw) => Some(
                    Paging::deserialize(raw)
                        .map_err(|e| ClientError::MalformedResponse(format!("paging: {e}")))?,
                ),
            };
            let items = match map.get("items") {
                Some(Value::Array(items)) => items.as_slice(),
                Some(Value::Null) | None => &[],
                Some(other) => {
                    return Err(ClientError::MalformedResponse(format!(
                        "expected an items array, found {other}"
                    )))
                }
            };
            Ok((items, paging))
        }
        other => Err(ClientError::MalformedResponse(format!(
            "expected a list payload, found {other}"
        ))),
    }
}
