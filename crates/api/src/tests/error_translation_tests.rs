// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use hoa_tickets_domain::DomainError;
use hoa_tickets_persistence::PersistenceError;

use crate::{
    ApiError, AuthError, PasswordPolicyError, translate_domain_error, translate_persistence_error,
};

#[test]
fn test_domain_errors_name_the_offending_field() {
    let cases: Vec<(DomainError, &str)> = vec![
        (DomainError::InvalidPhoneNumber(String::from("x")), "phoneNumber"),
        (DomainError::InvalidName(String::from("x")), "fullName"),
        (DomainError::InvalidAddress(String::from("x")), "address"),
        (DomainError::InvalidComplaint(String::from("x")), "complaint"),
        (DomainError::InvalidSpecializationTitle(String::from("x")), "jobName"),
        (DomainError::InvalidOrganizationName(String::from("x")), "name"),
        (DomainError::InvalidCost(String::from("x")), "cost"),
        (
            DomainError::InvalidRequestType {
                request_type: String::from("garden"),
            },
            "type",
        ),
        (
            DomainError::InvalidRequestStatus {
                status: String::from("lost"),
            },
            "status",
        ),
        (
            DomainError::InvalidIdentifier {
                field: String::from("houseID"),
                message: String::from("x"),
            },
            "houseID",
        ),
    ];

    for (err, expected_field) in cases {
        match translate_domain_error(err) {
            ApiError::InvalidInput { field, .. } => assert_eq!(field, expected_field),
            other => panic!("Expected InvalidInput for {expected_field}, got {other:?}"),
        }
    }
}

#[test]
fn test_status_transition_is_a_rule_violation() {
    let err = translate_domain_error(DomainError::InvalidStatusTransition {
        from: String::from("created"),
        to: String::from("created"),
    });

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "status_transition"
    ));
}

#[test]
fn test_credential_failures_are_indistinguishable() {
    let unknown = translate_persistence_error(PersistenceError::CredentialNotFound(String::from(
        "7001234567",
    )));
    let wrong = translate_persistence_error(PersistenceError::WrongPassword);

    assert_eq!(unknown, wrong);
    assert!(matches!(unknown, ApiError::AuthenticationFailed { .. }));
}

#[test]
fn test_missing_rows_become_not_found() {
    let cases: Vec<(PersistenceError, &str)> = vec![
        (PersistenceError::ResidentNotFound(String::from("r")), "Resident"),
        (PersistenceError::HouseNotFound(4), "House"),
        (
            PersistenceError::AssociationNotFound {
                resident_id: String::from("r"),
                house_id: 4,
            },
            "Resident house",
        ),
        (PersistenceError::StaffMemberNotFound(String::from("s")), "Staff member"),
        (PersistenceError::SpecializationNotFound(String::from("j")), "Specialization"),
        (PersistenceError::OrganizationNotFound(String::from("o")), "Organization"),
        (PersistenceError::RequestNotFound(String::from("q")), "Request"),
    ];

    for (err, expected_type) in cases {
        match translate_persistence_error(err) {
            ApiError::ResourceNotFound { resource_type, .. } => {
                assert_eq!(resource_type, expected_type);
            }
            other => panic!("Expected ResourceNotFound for {expected_type}, got {other:?}"),
        }
    }
}

#[test]
fn test_conflicts_and_internal_failures() {
    assert!(matches!(
        translate_persistence_error(PersistenceError::AlreadyExists(String::from("house"))),
        ApiError::Conflict { .. }
    ));
    assert!(matches!(
        translate_persistence_error(PersistenceError::QueryFailed(String::from("boom"))),
        ApiError::Internal { .. }
    ));
    assert!(matches!(
        translate_persistence_error(PersistenceError::CreatingRequestFailed(String::from(
            "exhausted"
        ))),
        ApiError::Internal { .. }
    ));
}

#[test]
fn test_auth_and_password_errors_convert() {
    let store: ApiError = AuthError::SessionStore {
        message: String::from("disk full"),
    }
    .into();
    assert!(matches!(store, ApiError::Internal { .. }));

    let policy: ApiError = PasswordPolicyError::TooShort { min_length: 5 }.into();
    assert!(matches!(policy, ApiError::PasswordPolicyViolation { .. }));
    assert!(policy.to_string().starts_with("Password policy violation"));
}
