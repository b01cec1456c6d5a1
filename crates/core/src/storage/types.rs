use serde::{Deserialize, Serialize};

/// Page used when the client does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the client does not ask for one.
pub const DEFAULT_LIMIT: u32 = 5;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Creates a page request, falling back to the defaults for missing or
    /// zero values.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE),
            limit: limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items that come before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Page metadata, serialized the way API clients expect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
    pub first_page: u32,
}

impl PageMeta {
    pub fn new(total: u64, pagination: Pagination) -> Self {
        let limit = u64::from(pagination.limit());
        let last_page = total.div_ceil(limit).max(1);
        Self {
            total,
            per_page: pagination.limit(),
            current_page: pagination.page(),
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            first_page: DEFAULT_PAGE,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub meta: PageMeta,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, pagination: Pagination) -> Self {
        Self {
            meta: PageMeta::new(total, pagination),
            data,
        }
    }

    /// Transforms every item, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            meta: self.meta,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

/// Cuts one page out of a fully materialized result set.
pub fn paginate<T>(items: Vec<T>, pagination: Pagination) -> Paginated<T> {
    let total = items.len() as u64;
    let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
    let data = items
        .into_iter()
        .skip(offset)
        .take(pagination.limit() as usize)
        .collect();
    Paginated::new(data, total, pagination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let pagination = Pagination::new(None, None);
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.limit(), 5);
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn test_pagination_rejects_zero() {
        let pagination = Pagination::new(Some(0), Some(0));
        assert_eq!(pagination, Pagination::default());
    }

    #[test]
    fn test_pagination_offset() {
        let pagination = Pagination::new(Some(3), Some(10));
        assert_eq!(pagination.offset(), 20);
    }

    #[test]
    fn test_paginate_middle_page() {
        let items: Vec<u32> = (1..=12).collect();
        let page = paginate(items, Pagination::new(Some(2), Some(5)));

        assert_eq!(page.data, vec![6, 7, 8, 9, 10]);
        assert_eq!(page.meta.total, 12);
        assert_eq!(page.meta.per_page, 5);
        assert_eq!(page.meta.current_page, 2);
        assert_eq!(page.meta.last_page, 3);
        assert_eq!(page.meta.first_page, 1);
    }

    #[test]
    fn test_paginate_past_the_end() {
        let items: Vec<u32> = (1..=3).collect();
        let page = paginate(items, Pagination::new(Some(4), Some(5)));

        assert!(page.data.is_empty());
        assert_eq!(page.meta.total, 3);
        assert_eq!(page.meta.last_page, 1);
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let page = paginate(Vec::<u32>::new(), Pagination::default());
        assert_eq!(page.meta.last_page, 1);
    }

    #[test]
    fn test_map_keeps_meta() {
        let page = paginate(vec![1, 2, 3], Pagination::default()).map(|n| n * 10);
        assert_eq!(page.data, vec![10, 20, 30]);
        assert_eq!(page.meta.total, 3);
    }

    #[test]
    fn test_meta_serializes_snake_case() {
        let page = paginate(vec!["a"], Pagination::default());
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["meta"]["per_page"], 5);
        assert_eq!(json["meta"]["current_page"], 1);
        assert_eq!(json["meta"]["last_page"], 1);
        assert_eq!(json["meta"]["first_page"], 1);
        assert_eq!(json["data"][0], "a");
    }
}
