//! Canonical list query construction.

use std::collections::BTreeMap;

use shared::domain::{FilterSet, PageCursor};
use url::form_urlencoded;

/// Query parameters for `GET /sales-reps`, keyed in sorted order so two
/// equivalent inputs always serialize the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    params: BTreeMap<&'static str, String>,
}

impl ListQuery {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn page(&self) -> u32 {
        self.get("page")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(1)
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        self.params
            .iter()
            .map(|(key, value)| (*key, value.clone()))
            .collect()
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}

pub fn build_query(filters: &FilterSet, cursor: PageCursor) -> ListQuery {
    let mut params = BTreeMap::new();
    params.insert("page", cursor.page.max(1).to_string());
    params.insert("page_size", cursor.page_size.max(1).to_string());
    for (field, value) in filters.active() {
        params.insert(field.query_key(), value.to_string());
    }
    ListQuery { params }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
