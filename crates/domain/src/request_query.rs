// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sort orders and filters for request listings.

use crate::request_status::{RequestStatus, RequestType};

/// Sort order for a resident's own requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResidentRequestSort {
    /// Status ascending, newest first within a status.
    StatusAsc,
    /// Request type ascending, newest first within a type.
    TypeAsc,
    /// Newest first.
    #[default]
    CreatedDesc,
}

impl ResidentRequestSort {
    /// Resolves a sort key. Unknown or missing keys use the default order.
    #[must_use]
    pub fn from_key(key: Option<&str>) -> Self {
        match key {
            Some("status_asc") => Self::StatusAsc,
            Some("type_asc") => Self::TypeAsc,
            _ => Self::CreatedDesc,
        }
    }
}

/// Sort order for the staff request panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestSort {
    /// Status ascending.
    StatusAsc,
    /// Status descending.
    StatusDesc,
    /// Request type ascending.
    TypeAsc,
    /// Request type descending.
    TypeDesc,
    /// Oldest first.
    CreatedAsc,
    /// Newest first.
    #[default]
    CreatedDesc,
}

impl RequestSort {
    /// Resolves a sort key. Unknown or missing keys use the default order.
    #[must_use]
    pub fn from_key(key: Option<&str>) -> Self {
        match key {
            Some("status_asc") => Self::StatusAsc,
            Some("status_desc") => Self::StatusDesc,
            Some("type_asc") => Self::TypeAsc,
            Some("type_desc") => Self::TypeDesc,
            Some("created_asc") => Self::CreatedAsc,
            _ => Self::CreatedDesc,
        }
    }
}

/// Sparse set of predicates for the staff request panel.
///
/// Every present predicate must match (AND). Substring predicates match
/// anywhere in the column; the rest are exact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    /// Substring of the request ID.
    pub id: Option<String>,
    /// Substring of the filing resident's ID.
    pub resident_id: Option<String>,
    /// Substring of the organization ID.
    pub organization_id: Option<String>,
    /// Substring of the complaint text.
    pub complaint: Option<String>,
    /// Exact request type.
    pub request_type: Option<RequestType>,
    /// Exact status.
    pub status: Option<RequestStatus>,
    /// Exact house.
    pub house_id: Option<i64>,
    /// Exact responsible staff member.
    pub responsible_id: Option<i64>,
    /// Sort order.
    pub sort: RequestSort,
    /// Maximum rows to return.
    pub limit: i64,
    /// Rows to skip.
    pub offset: i64,
}
