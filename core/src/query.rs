//! Query options and their canonical query-string form.
//!
//! A [`Query`] keeps its options in insertion order so the serialized string
//! is reproducible: pairs come out in the order the caller set them, never
//! sorted. Defaults are applied to a copy; the caller's query is untouched.

use std::fmt;

pub const ORDER_CREATED_AT_ASC: &str = "created_at asc";
pub const ORDER_CREATED_AT_DESC: &str = "created_at desc";
pub const ORDER_UPDATED_AT_ASC: &str = "updated_at asc";
pub const ORDER_UPDATED_AT_DESC: &str = "updated_at desc";

const PAGE: &str = "page";
const ORDER: &str = "order";

/// Ordered option map. A key may be present with no value (an explicit nil),
/// which counts as absent when defaults are filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, Option<String>)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, Some(value.to_string()));
        self
    }

    /// Builder-style explicit nil.
    pub fn unset(mut self, key: impl Into<String>) -> Self {
        self.set(key, None);
        self
    }

    pub fn page(self, page: u32) -> Self {
        self.param(PAGE, page)
    }

    pub fn order(self, order: &str) -> Self {
        self.param(ORDER, order)
    }

    /// Replace the value in place if the key exists, otherwise append it.
    pub fn set(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.params.push((key, value)),
        }
    }

    /// Remove a key entirely, returning its value if it had one.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.params.iter().position(|(k, _)| k == key)?;
        self.params.remove(idx).1
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    fn is_blank(&self, key: &str) -> bool {
        self.get(key).map_or(true, str::is_empty)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Copy with `page` defaulted to 1 and, for order-sensitive endpoints,
    /// `order` defaulted to `created_at asc`. Empty values count as absent,
    /// since they serialize the same way a nil does.
    pub fn normalized(&self, ordered: bool) -> Query {
        let mut query = self.clone();
        if query.is_blank(PAGE) {
            query.set(PAGE, Some("1".to_string()));
        }
        if ordered && query.is_blank(ORDER) {
            query.set(ORDER, Some(ORDER_CREATED_AT_ASC.to_string()));
        }
        query
    }

    /// Copy targeting another page, keeping every other option and its position.
    pub fn with_page(&self, page: u32) -> Query {
        self.clone().page(page)
    }

    /// `key=value` pairs joined by `&`, both sides percent-escaped. A nil
    /// value serializes as an empty string.
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    urlencoding::encode(k),
                    urlencoding::encode(v.as_deref().unwrap_or(""))
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Inverse of [`Query::to_query_string`]. Empty values come back as
    /// explicit nils; `+` is read as a space.
    pub fn parse(query_string: &str) -> Query {
        let mut query = Query::new();
        for pair in query_string.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(value);
            let value = (!value.is_empty()).then_some(value);
            query.set(decode_component(key), value);
        }
        query
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Query::new(), |query, (k, v)| query.param(k, v))
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Normalize `options` and serialize them. `ordered` selects whether the
/// endpoint gets a default `order`.
pub fn build(options: &Query, ordered: bool) -> String {
    options.normalized(ordered).to_query_string()
}
