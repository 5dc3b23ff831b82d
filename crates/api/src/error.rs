// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use hoa_tickets_domain::DomainError;
use hoa_tickets_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The session store could not be read or written.
    SessionStore {
        /// A description of the storage failure.
        message: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::SessionStore { message } => write!(f, "Session store error: {message}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent the
/// API contract. The server maps each variant to exactly one HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The resource already exists.
    Conflict {
        /// The type of resource that conflicted.
        resource_type: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} already exists: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
            AuthError::SessionStore { message } => Self::Internal { message },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidPhoneNumber(msg) => ApiError::InvalidInput {
            field: String::from("phoneNumber"),
            message: msg,
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("fullName"),
            message: msg,
        },
        DomainError::InvalidAddress(msg) => ApiError::InvalidInput {
            field: String::from("address"),
            message: msg,
        },
        DomainError::InvalidComplaint(msg) => ApiError::InvalidInput {
            field: String::from("complaint"),
            message: msg,
        },
        DomainError::InvalidSpecializationTitle(msg) => ApiError::InvalidInput {
            field: String::from("jobName"),
            message: msg,
        },
        DomainError::InvalidOrganizationName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidIdentifier { field, message } => {
            ApiError::InvalidInput { field, message }
        }
        DomainError::InvalidRequestStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown request status '{status}'"),
        },
        DomainError::InvalidRequestType { request_type } => ApiError::InvalidInput {
            field: String::from("type"),
            message: format!("Unknown request type '{request_type}'"),
        },
        DomainError::InvalidStaffMemberStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown staff member status '{status}'"),
        },
        DomainError::InvalidCost(msg) => ApiError::InvalidInput {
            field: String::from("cost"),
            message: msg,
        },
        DomainError::InvalidStatusTransition { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("status_transition"),
            message: format!("Request status cannot change from '{from}' to '{to}'"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Missing rows become `ResourceNotFound`, natural-key collisions become
/// `Conflict`, credential failures become `AuthenticationFailed`, and
/// everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::CredentialNotFound(_) | PersistenceError::WrongPassword => {
            ApiError::AuthenticationFailed {
                reason: String::from("Invalid phone number or password"),
            }
        }
        PersistenceError::ResidentNotFound(msg) => not_found("Resident", msg),
        PersistenceError::HouseNotFound(house_id) => {
            not_found("House", format!("No house with ID {house_id}"))
        }
        PersistenceError::AssociationNotFound {
            resident_id,
            house_id,
        } => not_found(
            "Resident house",
            format!("Resident {resident_id} is not associated with house {house_id}"),
        ),
        PersistenceError::StaffMemberNotFound(msg) => not_found("Staff member", msg),
        PersistenceError::SpecializationNotFound(msg) => not_found("Specialization", msg),
        PersistenceError::OrganizationNotFound(msg) => not_found("Organization", msg),
        PersistenceError::RequestNotFound(msg) => not_found("Request", msg),
        PersistenceError::SessionNotFound(msg) => not_found("Session", msg),
        PersistenceError::NotFound(msg) => not_found("Resource", msg),
        PersistenceError::AlreadyExists(msg) => ApiError::Conflict {
            resource_type: String::from("Resource"),
            message: msg,
        },
        PersistenceError::CreatingMemberFailed(msg) => ApiError::Conflict {
            resource_type: String::from("Staff member"),
            message: msg,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

fn not_found(resource_type: &str, message: String) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message,
    }
}
