//! Pagination utilities for list responses.
//!
//! Supports both offset-based (`limit` + `offset`) and page-based (`limit` +
//! `page`) pagination. When `page` is provided it takes precedence over
//! `offset`.
//!
//! # Example
//!
//! ```ignore
//! use sisprof_core::pagination::PaginationParams;
//!
//! // GET /api/students?limit=20&page=3
//! let (students, meta) = params.apply(all_students);
//! Json(PaginatedStudentsResponse { data: students, meta })
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::empty_string_as_none;

/// Metadata about a paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Maximum items per page (the limit that was applied)
    pub limit: i64,
    /// Number of items skipped (only present if offset-based pagination was used)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Current page number (only present if page-based pagination was used)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether there are more items after this page
    pub has_more: bool,
}

/// Query parameters for pagination.
///
/// - `limit` is clamped to the range [1, 100], default 10
/// - `offset` is clamped to a minimum of 0
/// - `page` is clamped to a minimum of 1
#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 10)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0, ignored if `page` is set)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub offset: Option<i64>,
    /// Page number (1-indexed)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<i64>,
}

impl PaginationParams {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        match self.page {
            Some(page) => (page.max(1) - 1) * self.limit(),
            None => self.offset.unwrap_or(0).max(0),
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }

    /// Slices an already filtered and ordered list down to the requested window.
    pub fn apply<T>(&self, items: Vec<T>) -> (Vec<T>, PaginationMeta) {
        let total = items.len() as i64;
        let limit = self.limit();
        let offset = self.offset();

        let data: Vec<T> = items
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        let meta = PaginationMeta {
            total,
            limit,
            offset: if self.page.is_some() { None } else { Some(offset) },
            page: self.page(),
            has_more: offset + limit < total,
        };

        (data, meta)
    }
}
