// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request lifecycle states and request categories.
//!
//! A request starts in `Created`. Staff move it through `Assigned` to
//! `Completed`, or divert it to `Cancelled`, `Suspended` or `Transferred`
//! (handed to an organization). Any enumerated status may follow any other;
//! every applied change is recorded in the request audit trail.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of a maintenance request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Filed by a resident, not yet picked up.
    #[default]
    Created,
    /// A staff member is responsible and working on it.
    Assigned,
    /// Work is finished.
    Completed,
    /// Withdrawn or rejected.
    Cancelled,
    /// Put on hold.
    Suspended,
    /// Handed over to an external organization.
    Transferred,
}

impl RequestStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Created,
        Self::Assigned,
        Self::Completed,
        Self::Cancelled,
        Self::Suspended,
        Self::Transferred,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Assigned => "assigned",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Suspended => "suspended",
            Self::Transferred => "transferred",
        }
    }

    /// Returns true for statuses that usually end a request's life.
    ///
    /// Terminal statuses are informational only; they do not block
    /// further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Checks whether a request in this status may move to `target`.
    ///
    /// Staff have full discretion over the lifecycle, so every pair of
    /// enumerated statuses is allowed, including re-opening a completed
    /// or cancelled request.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Created
                    | Self::Assigned
                    | Self::Completed
                    | Self::Cancelled
                    | Self::Suspended
                    | Self::Transferred,
                Self::Created
                    | Self::Assigned
                    | Self::Completed
                    | Self::Cancelled
                    | Self::Suspended
                    | Self::Transferred,
            )
        )
    }

    /// Validates a transition from this status to `target`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is
    /// not permitted.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
            })
        }
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "assigned" => Ok(Self::Assigned),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "suspended" => Ok(Self::Suspended),
            "transferred" => Ok(Self::Transferred),
            _ => Err(DomainError::InvalidRequestStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of a maintenance request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    /// Repair inside a resident's apartment.
    #[serde(rename = "apartment-internal")]
    ApartmentInternal,
    /// Repair of shared property (stairwells, roofs, yards).
    #[serde(rename = "common-property")]
    CommonProperty,
}

impl RequestType {
    /// Returns the string representation of the request type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ApartmentInternal => "apartment-internal",
            Self::CommonProperty => "common-property",
        }
    }
}

impl FromStr for RequestType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apartment-internal" => Ok(Self::ApartmentInternal),
            "common-property" => Ok(Self::CommonProperty),
            _ => Err(DomainError::InvalidRequestType {
                request_type: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
