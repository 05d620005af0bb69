//! # Pagination
//!
//! Page/offset arithmetic for paginated listings.
//!
//! ## Page Math
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  total_items = 23, page_size = 10                                      │
//! │                                                                         │
//! │  page 1 → OFFSET  0 LIMIT 10 → items  1..10                            │
//! │  page 2 → OFFSET 10 LIMIT 10 → items 11..20                            │
//! │  page 3 → OFFSET 20 LIMIT 10 → items 21..23                            │
//! │                                                                         │
//! │  total_pages = ceil(23 / 10) = 3                                       │
//! │  total_items = 0  →  total_pages = 0                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Page used when the caller does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Number of pages needed to show `total_items` at `page_size` per page.
pub fn total_pages(total_items: i64, page_size: u32) -> i64 {
    if total_items <= 0 || page_size == 0 {
        return 0;
    }
    let size = i64::from(page_size);
    (total_items + size - 1) / size
}

/// A validated page request (1-based page number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Creates a page request, rejecting zero and oversized values.
    pub fn new(page: u32, page_size: u32) -> CoreResult<Self> {
        if page == 0 {
            return Err(CoreError::InvalidPageParameter {
                field: "page".to_string(),
                value: page.to_string(),
                max: u32::MAX,
            });
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(CoreError::InvalidPageParameter {
                field: "pageSize".to_string(),
                value: page_size.to_string(),
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(PageRequest { page, page_size })
    }

    /// Parses raw query-string values.
    ///
    /// Absent or blank values fall back to [`DEFAULT_PAGE`] and
    /// `default_page_size`.
    ///
    /// ## Example
    /// ```rust
    /// use frappe_core::pagination::PageRequest;
    ///
    /// let req = PageRequest::parse(Some("3"), None, 10).unwrap();
    /// assert_eq!(req.offset(), 20);
    /// assert!(PageRequest::parse(Some("zero"), None, 10).is_err());
    /// ```
    pub fn parse(
        page: Option<&str>,
        page_size: Option<&str>,
        default_page_size: u32,
    ) -> CoreResult<Self> {
        let page = parse_param("page", page, DEFAULT_PAGE, u32::MAX)?;
        let page_size = parse_param("pageSize", page_size, default_page_size, MAX_PAGE_SIZE)?;
        PageRequest::new(page, page_size)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// SQL `OFFSET` value.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    /// SQL `LIMIT` value.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_param(field: &str, raw: Option<&str>, default: u32, max: u32) -> CoreResult<u32> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(default),
        Some(raw) => raw,
    };

    raw.parse::<u32>()
        .ok()
        .filter(|v| *v >= 1 && *v <= max)
        .ok_or_else(|| CoreError::InvalidPageParameter {
            field: field.to_string(),
            value: raw.to_string(),
            max,
        })
}

/// One page of results plus the numbers a client needs to navigate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub current_page: u32,
    pub has_next_page: bool,
    pub page_size: u32,
    pub total_pages: i64,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Builds a page from the request that produced it.
    pub fn new(request: PageRequest, total_items: i64, data: Vec<T>) -> Self {
        let total_pages = total_pages(total_items, request.page_size());
        Page {
            current_page: request.page(),
            has_next_page: i64::from(request.page()) < total_pages,
            page_size: request.page_size(),
            total_pages,
            data,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 10).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(2, 10).unwrap().offset(), 10);
        assert_eq!(PageRequest::new(5, 25).unwrap().offset(), 100);
        assert_eq!(PageRequest::new(3, 7).unwrap().limit(), 7);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(total_pages(100, 1), 100);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(1, MAX_PAGE_SIZE + 1).is_err());
        assert!(PageRequest::new(1, MAX_PAGE_SIZE).is_ok());
    }

    #[test]
    fn test_parse_defaults() {
        let req = PageRequest::parse(None, None, 10).unwrap();
        assert_eq!(req.page(), 1);
        assert_eq!(req.page_size(), 10);

        let req = PageRequest::parse(Some(""), Some("  "), 25).unwrap();
        assert_eq!(req.page_size(), 25);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = PageRequest::parse(Some("-1"), None, 10).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidPageParameter { ref field, .. } if field == "page"
        ));

        let err = PageRequest::parse(None, Some("500"), 10).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidPageParameter { ref field, max: MAX_PAGE_SIZE, .. } if field == "pageSize"
        ));
    }

    #[test]
    fn test_page_navigation_flags() {
        let req = PageRequest::new(2, 10).unwrap();
        let page = Page::new(req, 23, vec![1, 2, 3]);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next_page);

        let req = PageRequest::new(3, 10).unwrap();
        let page: Page<i32> = Page::new(req, 23, vec![]);
        assert!(!page.has_next_page);

        let page: Page<i32> = Page::new(PageRequest::default(), 0, vec![]);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page::new(PageRequest::default(), 1, vec!["x"]);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["hasNextPage"], false);
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["totalPages"], 1);
    }
}
