// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Phone number is empty, has the wrong length, or contains non-digits.
    InvalidPhoneNumber(String),
    /// Full name is empty or invalid.
    InvalidName(String),
    /// House address is empty or invalid.
    InvalidAddress(String),
    /// Complaint text is empty.
    InvalidComplaint(String),
    /// Specialization title is empty or invalid.
    InvalidSpecializationTitle(String),
    /// Organization name is empty or invalid.
    InvalidOrganizationName(String),
    /// An identifier field is empty or malformed.
    InvalidIdentifier {
        /// The field holding the identifier.
        field: String,
        /// A description of the problem.
        message: String,
    },
    /// Request status string is not one of the enumerated statuses.
    InvalidRequestStatus {
        /// The rejected status value.
        status: String,
    },
    /// Request type string is not one of the enumerated types.
    InvalidRequestType {
        /// The rejected type value.
        request_type: String,
    },
    /// Staff member status string is not one of the enumerated statuses.
    InvalidStaffMemberStatus {
        /// The rejected status value.
        status: String,
    },
    /// Cost is negative or not a finite number.
    InvalidCost(String),
    /// A status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPhoneNumber(msg) => write!(f, "Invalid phone number: {msg}"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidAddress(msg) => write!(f, "Invalid address: {msg}"),
            Self::InvalidComplaint(msg) => write!(f, "Invalid complaint: {msg}"),
            Self::InvalidSpecializationTitle(msg) => {
                write!(f, "Invalid specialization title: {msg}")
            }
            Self::InvalidOrganizationName(msg) => write!(f, "Invalid organization name: {msg}"),
            Self::InvalidIdentifier { field, message } => {
                write!(f, "Invalid identifier '{field}': {message}")
            }
            Self::InvalidRequestStatus { status } => {
                write!(f, "Invalid request status: '{status}'")
            }
            Self::InvalidRequestType { request_type } => {
                write!(f, "Invalid request type: '{request_type}'")
            }
            Self::InvalidStaffMemberStatus { status } => {
                write!(f, "Invalid staff member status: '{status}'")
            }
            Self::InvalidCost(msg) => write!(f, "Invalid cost: {msg}"),
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Request status cannot change from '{from}' to '{to}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}
