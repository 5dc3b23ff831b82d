// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `credentials` - Login credential lookup and user listing
//! - `residents` - Residents, houses and their associations
//! - `staff` - Staff members, specializations, organizations, least-busy lookup
//! - `requests` - Request lookup, filtering and pagination
//! - `sessions` - Session lookup
//! - `audit` - Request history
//!
//! Every module keeps its Diesel row structs private and maps them to
//! domain entities explicitly.

pub mod audit;
pub mod credentials;
pub mod requests;
pub mod residents;
pub mod sessions;
pub mod staff;

/// Escape character used by [`like_pattern`].
pub(crate) const LIKE_ESCAPE: char = '\\';

/// Wraps a user-supplied pattern for a literal substring `LIKE` match.
///
/// `%`, `_` and the escape character itself are escaped so they match
/// only themselves.
pub(crate) fn like_pattern(pattern: &str) -> String {
    let mut escaped: String = String::with_capacity(pattern.len() + 2);
    escaped.push('%');
    for c in pattern.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
