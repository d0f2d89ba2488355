//! Page/limit handling for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: i64,
    pub limit: i64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    /// `page` and `limit` never drop below 1. Larger values are taken as
    /// requested.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
        }
    }

    /// Stays within `BIGINT`; a page past the end of any table yields an
    /// empty result instead of wrapping.
    pub fn get_offset(&self) -> u64 {
        (self.page - 1).checked_mul(self.limit).unwrap_or(i64::MAX) as u64
    }

    pub fn get_limit(&self) -> u64 {
        self.limit as u64
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            total / self.limit + i64::from(total % self.limit != 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params() {
        let params = PaginationParams::new(Some(2), Some(10));
        assert_eq!(params.page, 2);
        assert_eq!(params.get_offset(), 10);
        assert_eq!(params.get_limit(), 10);
    }

    #[test]
    fn test_pagination_params_defaults() {
        let params = PaginationParams::new(None, None);
        assert_eq!(params.page, 1);
        assert_eq!(params.get_offset(), 0);
        assert_eq!(params.get_limit(), 10);
    }

    #[test]
    fn test_zero_and_negative_values_are_coerced() {
        let params = PaginationParams::new(Some(0), Some(0));
        assert_eq!(params, PaginationParams { page: 1, limit: 1 });
        assert_eq!(params.total_pages(3), 3);

        let params = PaginationParams::new(Some(-4), Some(-1));
        assert_eq!(params, PaginationParams { page: 1, limit: 1 });
    }

    #[test]
    fn test_large_limit_is_kept() {
        let params = PaginationParams::new(Some(1), Some(200));
        assert_eq!(params.get_limit(), 200);
        assert_eq!(params.total_pages(150), 1);
        assert_eq!(params.total_pages(201), 2);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let params = PaginationParams::new(Some(i64::MAX), Some(1_000));
        assert_eq!(params.get_offset(), i64::MAX as u64);

        let params = PaginationParams::new(Some(3), Some(i64::MAX));
        assert_eq!(params.get_offset(), i64::MAX as u64);
        assert_eq!(params.total_pages(i64::MAX), 1);
        assert_eq!(params.total_pages(5), 1);
    }

    #[test]
    fn test_total_pages() {
        let params = PaginationParams::new(Some(2), Some(10));
        assert_eq!(params.total_pages(15), 2);
        assert_eq!(params.total_pages(20), 2);
        assert_eq!(params.total_pages(21), 3);
        assert_eq!(params.total_pages(0), 0);
    }
}
