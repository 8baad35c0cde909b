use crate::validation::{ValidationError, ValidationErrors, validators::validate_at_least};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_CURRENT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Page-number pagination as sent by clients.
///
/// Both values are 1-based and optional:
/// `GET /book?currentPage=2&pageSize=25`
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page to return, starting at 1. Defaults to 1.
    #[param(example = 1, minimum = 1)]
    pub current_page: Option<i64>,
    /// Number of items per page. Defaults to 10.
    #[param(example = 10, minimum = 1)]
    pub page_size: Option<i64>,
}

/// Offset/limit pair consumed by the repository's list operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    pub limit: u64,
    pub offset: u64,
}

impl LimitOffset {
    #[must_use]
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }
}

impl Default for LimitOffset {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE.unsigned_abs(), 0)
    }
}

impl TryFrom<PageParams> for LimitOffset {
    type Error = ValidationErrors;

    /// `limit = pageSize`, `offset = pageSize * (currentPage - 1)`
    fn try_from(params: PageParams) -> Result<Self, Self::Error> {
        let current_page = params.current_page.unwrap_or(DEFAULT_CURRENT_PAGE);
        let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        let mut errors = ValidationErrors::new();
        errors.check(validate_at_least("currentPage", current_page, 1));
        errors.check(validate_at_least("pageSize", page_size, 1));
        errors.result()?;

        let limit = page_size.unsigned_abs();
        // offsets are bound as signed 64-bit integers by the SQL drivers
        let offset = limit
            .checked_mul(current_page.unsigned_abs() - 1)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| ValidationError::new("currentPage", "is out of range"))?;

        Ok(Self { limit, offset })
    }
}

/// Page envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OffsetPagination<T> {
    pub items: Vec<T>,
    /// Row count of the whole table, unaffected by pagination
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl<T> OffsetPagination<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, page: LimitOffset) -> Self {
        Self {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(current_page: Option<i64>, page_size: Option<i64>) -> PageParams {
        PageParams {
            current_page,
            page_size,
        }
    }

    #[test]
    fn test_defaults_to_first_page_of_ten() {
        let page = LimitOffset::try_from(PageParams::default()).unwrap();
        assert_eq!(page, LimitOffset::new(10, 0));
        assert_eq!(page, LimitOffset::default());
    }

    #[test]
    fn test_offset_is_page_size_times_previous_pages() {
        for (current_page, page_size) in [(1, 1), (2, 2), (3, 10), (7, 25), (100, 3)] {
            let page = LimitOffset::try_from(params(Some(current_page), Some(page_size))).unwrap();
            assert_eq!(page.limit, page_size.unsigned_abs());
            assert_eq!(
                page.offset,
                (page_size * (current_page - 1)).unsigned_abs()
            );
        }
    }

    #[test]
    fn test_first_page_always_starts_at_zero() {
        for page_size in [1, 5, 10, 1000] {
            let page = LimitOffset::try_from(params(Some(1), Some(page_size))).unwrap();
            assert_eq!(page.offset, 0);
        }
    }

    #[test]
    fn test_rejects_non_positive_current_page() {
        for current_page in [0, -1, i64::MIN] {
            let errors = LimitOffset::try_from(params(Some(current_page), None)).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.errors()[0].field, "currentPage");
        }
    }

    #[test]
    fn test_rejects_non_positive_page_size() {
        let errors = LimitOffset::try_from(params(None, Some(0))).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].field, "pageSize");
    }

    #[test]
    fn test_reports_both_invalid_values() {
        let errors = LimitOffset::try_from(params(Some(0), Some(-5))).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_offset_overflow_is_rejected() {
        let errors = LimitOffset::try_from(params(Some(i64::MAX), Some(i64::MAX))).unwrap_err();
        assert_eq!(errors.errors()[0].message, "is out of range");
    }

    #[test]
    fn test_query_string_uses_camel_case() {
        let parsed: PageParams = serde_json::from_value(serde_json::json!({
            "currentPage": 3,
            "pageSize": 4
        }))
        .unwrap();
        assert_eq!(parsed.current_page, Some(3));
        assert_eq!(parsed.page_size, Some(4));
    }
}
