//! Pagination types shared by list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination block of the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Current page, 1-based.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Records across all pages.
    pub total: u64,
    /// Number of pages.
    pub total_pages: u32,
}

impl PageMeta {
    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records on this page.
    pub items: Vec<T>,
    /// Pagination, when the server sent it.
    pub meta: Option<PageMeta>,
}

impl<T> Page<T> {
    /// Page of `items`.
    #[must_use]
    pub const fn new(items: Vec<T>, meta: Option<PageMeta>) -> Self {
        Self { items, meta }
    }

    /// Number of records on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Query parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    search: Option<String>,
    status: Option<String>,
}

impl ListQuery {
    const MAX_LIMIT: u32 = 100;

    /// Empty query; the server applies its defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the 1-based page, clamping 0 to 1.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    /// Sets the page size, clamped to `1..=100`.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit.clamp(1, Self::MAX_LIMIT));
        self
    }

    /// Sets a search term; blank terms are dropped.
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.trim().is_empty()).then(|| search.trim().to_string());
        self
    }

    /// Filters by publication status.
    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Returns the query string pairs in a stable order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_from_envelope() {
        let meta: PageMeta =
            serde_json::from_str(r#"{"page": 2, "limit": 10, "total": 35, "totalPages": 4}"#)
                .unwrap();
        assert!(meta.has_next());
        assert!(meta.has_previous());
    }

    #[test]
    fn test_last_page() {
        let meta = PageMeta {
            page: 4,
            limit: 10,
            total: 35,
            total_pages: 4,
        };
        assert!(!meta.has_next());
    }

    #[test]
    fn test_query_pairs() {
        let query = ListQuery::new().page(0).limit(500).search("  rust ");
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "1".to_string()),
                ("limit", "100".to_string()),
                ("search", "rust".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_search_dropped() {
        assert!(ListQuery::new().search("   ").to_pairs().is_empty());
    }
}
