//! Pagination request/response types shared by every list endpoint

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::PaginationConfig;

/// Raw `page` / `limit` query parameters
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Rows per page (default: 25)
    pub limit: Option<i64>,
}

/// Resolved page window, always with `page >= 1` and `1 <= limit <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn resolve(params: &PageParams, defaults: &PaginationConfig) -> Self {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params
            .limit
            .unwrap_or(defaults.default_limit)
            .clamp(1, defaults.max_limit.max(1));
        Self { page, limit }
    }

    /// Rows skipped before this page; saturates instead of wrapping negative
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination metadata returned next to the rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total_pages(total, request.limit),
        }
    }
}

/// `ceil(total / limit)`, zero when there are no rows
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

/// One page of rows plus its metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> PaginationConfig {
        PaginationConfig {
            default_limit: 25,
            max_limit: 100,
        }
    }

    #[test]
    fn test_defaults() {
        let request = PageRequest::resolve(&PageParams::default(), &defaults());
        assert_eq!(request, PageRequest { page: 1, limit: 25 });
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_non_positive_page_is_clamped() {
        for page in [0, -1, -50] {
            let request = PageRequest::resolve(
                &PageParams {
                    page: Some(page),
                    limit: Some(10),
                },
                &defaults(),
            );
            assert_eq!(request.page, 1);
            assert_eq!(request.offset(), 0);
        }
    }

    #[test]
    fn test_huge_page_never_yields_negative_offset() {
        let request = PageRequest::resolve(
            &PageParams {
                page: Some(i64::MAX),
                limit: Some(25),
            },
            &defaults(),
        );
        assert_eq!(request.offset(), i64::MAX);

        let request = PageRequest::resolve(
            &PageParams {
                page: Some(i64::MAX / 25 + 1),
                limit: Some(25),
            },
            &defaults(),
        );
        assert!(request.offset() >= 0);
    }

    #[test]
    fn test_limit_is_clamped() {
        let too_big = PageRequest::resolve(
            &PageParams {
                page: Some(3),
                limit: Some(10_000),
            },
            &defaults(),
        );
        assert_eq!(too_big.limit, 100);
        assert_eq!(too_big.offset(), 200);

        let zero = PageRequest::resolve(
            &PageParams {
                page: None,
                limit: Some(0),
            },
            &defaults(),
        );
        assert_eq!(zero.limit, 1);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 25), 0);
        assert_eq!(total_pages(1, 25), 1);
        assert_eq!(total_pages(25, 25), 1);
        assert_eq!(total_pages(26, 25), 2);
        for limit in 1..=7 {
            for total in 0..=50 {
                let expected = (total as f64 / limit as f64).ceil() as i64;
                assert_eq!(total_pages(total, limit), expected, "total={total} limit={limit}");
            }
        }
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let pagination = Pagination::new(PageRequest { page: 2, limit: 10 }, 31);
        let json = serde_json::to_value(pagination).unwrap();
        assert_eq!(json["totalPages"], 4);
        assert_eq!(json["page"], 2);
        assert_eq!(json["total"], 31);
    }
}
