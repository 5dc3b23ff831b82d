// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rule validation for the HOA maintenance ticketing system.
//!
//! Residents file requests (tickets) against houses they are associated
//! with. Staff members, qualified through specializations, work those
//! requests or hand them to organizations.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod pagination;
mod request_query;
mod request_status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use pagination::{
    DIRECTORY_PAGE_LIMITS, PageLimits, PageMeta, PageRequest, RESIDENT_REQUEST_PAGE_LIMITS,
    STAFF_REQUEST_PAGE_LIMITS, USER_PAGE_LIMITS, count_pages,
};
pub use request_query::{RequestFilter, RequestSort, ResidentRequestSort};
pub use request_status::{RequestStatus, RequestType};
pub use types::{
    House, NewRequest, Organization, Request, Resident, Specialization, StaffMember,
    StaffMemberStatus, User,
};
pub use validation::{
    PHONE_NUMBER_MAX_LENGTH, PHONE_NUMBER_MIN_LENGTH, parse_numeric_id, validate_address,
    validate_complaint, validate_cost, validate_full_name, validate_opaque_id,
    validate_organization_name, validate_phone_number, validate_specialization_title,
};
