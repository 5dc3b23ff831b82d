// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::request_status::{RequestStatus, RequestType};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// A login credential.
///
/// The phone number is the login. The password hash never leaves the
/// persistence layer, so it is not part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The phone number used to log in.
    pub phone_number: String,
}

impl User {
    /// Creates a new `User`.
    #[must_use]
    pub const fn new(phone_number: String) -> Self {
        Self { phone_number }
    }
}

/// A resident of the association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    /// Opaque generated identifier.
    pub id: String,
    /// Phone number linking the resident to a login credential.
    pub phone_number: String,
    /// The resident's full name.
    pub full_name: String,
}

/// A house managed by the association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    /// Database-assigned identifier.
    pub id: i64,
    /// Postal address (free text).
    pub address: String,
}

/// Employment status of a staff member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffMemberStatus {
    /// Working and eligible for assignments.
    #[default]
    Active,
    /// No longer working for the association.
    Inactive,
    /// Temporarily barred from assignments.
    Suspended,
}

impl StaffMemberStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }
}

impl FromStr for StaffMemberStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "suspended" => Ok(Self::Suspended),
            _ => Err(DomainError::InvalidStaffMemberStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for StaffMemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A member of the maintenance staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Database-assigned identifier.
    pub id: i64,
    /// Phone number linking the staff member to a login credential.
    pub phone_number: String,
    /// The staff member's full name.
    pub full_name: String,
    /// Current employment status.
    pub status: StaffMemberStatus,
}

/// A job category, such as "plumber".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialization {
    /// Opaque generated identifier.
    pub id: String,
    /// The job title.
    pub title: String,
}

/// An external organization that requests can be handed over to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Opaque generated identifier.
    pub id: String,
    /// The organization's name.
    pub name: String,
}

/// A maintenance request (ticket) filed by a resident against a house.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Opaque generated identifier.
    pub id: String,
    /// The resident who filed the request.
    pub resident_id: String,
    /// The house the request is about.
    pub house_id: i64,
    /// The repair category.
    pub request_type: RequestType,
    /// What is wrong.
    pub complaint: String,
    /// Cost of the repair, once known.
    pub cost: Option<f64>,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// The staff member responsible for the request, if any.
    pub responsible_id: Option<i64>,
    /// The organization the request was handed to, if any.
    pub organization_id: Option<String>,
    /// Server time at creation. Never changes afterwards.
    pub created_at: OffsetDateTime,
}

/// Input for filing a new request.
///
/// The filing resident's ownership of the house is checked by the caller
/// before this value reaches the request store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    /// The filing resident.
    pub resident_id: String,
    /// The house the request is about.
    pub house_id: i64,
    /// The repair category.
    pub request_type: RequestType,
    /// What is wrong.
    pub complaint: String,
}
