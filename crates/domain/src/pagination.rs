// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Page arithmetic shared by every paginated listing.
//!
//! Pages are 1-based. Missing, unparseable or non-positive parameters fall
//! back to defaults, and limits above a resource's cap are clamped.

use serde::{Deserialize, Serialize};

/// Default and maximum page sizes for one kind of listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Page size used when the caller does not supply one.
    pub default_limit: i64,
    /// Largest page size a caller may request.
    pub max_limit: i64,
}

impl PageLimits {
    /// Creates page limits.
    #[must_use]
    pub const fn new(default_limit: i64, max_limit: i64) -> Self {
        Self {
            default_limit,
            max_limit,
        }
    }
}

/// Page limits for a resident's own requests.
pub const RESIDENT_REQUEST_PAGE_LIMITS: PageLimits = PageLimits::new(10, 100);
/// Page limits for the staff request panel.
pub const STAFF_REQUEST_PAGE_LIMITS: PageLimits = PageLimits::new(20, 500);
/// Page limits for the user listing.
pub const USER_PAGE_LIMITS: PageLimits = PageLimits::new(20, 1000);
/// Page limits for houses, organizations and specializations.
pub const DIRECTORY_PAGE_LIMITS: PageLimits = PageLimits::new(20, 100);

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// The 1-based page number.
    pub page: i64,
    /// The number of items per page.
    pub limit: i64,
}

impl PageRequest {
    /// Resolves raw `page` and `limit` parameters against `limits`.
    ///
    /// # Arguments
    ///
    /// * `page` - The raw page parameter, if present
    /// * `limit` - The raw limit parameter, if present
    /// * `limits` - Defaults and caps for this listing
    #[must_use]
    pub fn from_params(page: Option<&str>, limit: Option<&str>, limits: PageLimits) -> Self {
        let page: i64 = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);

        let limit: i64 = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l > 0)
            .map_or(limits.default_limit, |l| l.min(limits.max_limit));

        Self { page, limit }
    }

    /// Returns the number of rows to skip for this page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Builds the metadata block for a listing that matched `total` rows.
    #[must_use]
    pub const fn meta(&self, total: i64) -> PageMeta {
        PageMeta {
            total,
            page: self.page,
            limit: self.limit,
            pages: count_pages(total, self.limit),
        }
    }
}

/// Pagination metadata returned with every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Total number of matching rows.
    pub total: i64,
    /// The 1-based page number returned.
    pub page: i64,
    /// The page size used.
    pub limit: i64,
    /// Total number of pages.
    pub pages: i64,
}

/// Computes the number of pages needed to show `total` rows.
///
/// An empty result still reports one (empty) page.
///
/// # Arguments
///
/// * `total` - The number of matching rows
/// * `limit` - The page size; must be positive
#[must_use]
pub const fn count_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 1;
    }

    let mut pages: i64 = total / limit;
    if total % limit != 0 {
        pages += 1;
    }
    pages
}
