// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account registration and removal tests.

use crate::{Persistence, PersistenceError, RegisteredAccount};
use hoa_tickets_domain::{Request, StaffMemberStatus};

use super::{
    create_new_request, create_resident_actor, create_test_persistence, seed_resident_with_house,
};

#[test]
fn test_register_account_with_both_roles() {
    let mut persistence: Persistence = create_test_persistence();

    let account: RegisteredAccount = persistence
        .register_account("7001234567", "Secret1", "Jane Doe", true, true)
        .unwrap();

    assert_eq!(account.user.phone_number, "7001234567");
    let resident = account.resident.unwrap();
    assert_eq!(resident.full_name, "Jane Doe");
    let staff = account.staff_member.unwrap();
    assert_eq!(staff.status, StaffMemberStatus::Active);

    assert_eq!(
        persistence.get_resident_by_phone("7001234567").unwrap(),
        resident
    );
    assert_eq!(
        persistence.get_staff_member_by_phone("7001234567").unwrap(),
        staff
    );
    assert!(persistence.authorize_user("7001234567", "Secret1").is_ok());
}

#[test]
fn test_register_account_requires_a_role() {
    let mut persistence: Persistence = create_test_persistence();

    let result: Result<RegisteredAccount, PersistenceError> =
        persistence.register_account("7001234567", "Secret1", "Jane Doe", false, false);

    assert!(matches!(result, Err(PersistenceError::Other(_))));
    assert!(!persistence.credential_exists("7001234567").unwrap());
}

#[test]
fn test_failed_registration_rolls_back_credential() {
    let mut persistence: Persistence = create_test_persistence();
    // A staff member already holds the phone number without a credential.
    persistence
        .register_staff_member("7001234567", "Existing Member")
        .unwrap();

    let result: Result<RegisteredAccount, PersistenceError> =
        persistence.register_account("7001234567", "Secret1", "Jane Doe", true, true);

    assert!(matches!(
        result,
        Err(PersistenceError::CreatingMemberFailed(_))
    ));
    assert!(!persistence.credential_exists("7001234567").unwrap());
    assert!(matches!(
        persistence.get_resident_by_phone("7001234567"),
        Err(PersistenceError::ResidentNotFound(_))
    ));
}

#[test]
fn test_delete_user_cascades_profiles_requests_and_sessions() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .register_account("7001234567", "Secret1", "Jane Doe", true, true)
        .unwrap();
    let resident = persistence.get_resident_by_phone("7001234567").unwrap();
    let house = persistence.register_house("Main St 1").unwrap();
    persistence.add_resident_house(&resident.id, house.id).unwrap();
    let request: Request = persistence
        .create_request(
            &create_new_request(&resident, &house, "Leaking pipe"),
            &create_resident_actor("7001234567"),
        )
        .unwrap();
    persistence
        .create_session("token-1", "7001234567", "staff", "2099-01-01T00:00:00.000000Z")
        .unwrap();

    persistence.delete_user("7001234567").unwrap();

    assert!(!persistence.credential_exists("7001234567").unwrap());
    assert!(persistence.get_resident_by_phone("7001234567").is_err());
    assert!(persistence.get_staff_member_by_phone("7001234567").is_err());
    assert!(matches!(
        persistence.get_request_by_id(&request.id),
        Err(PersistenceError::RequestNotFound(_))
    ));
    assert_eq!(persistence.get_session_by_token("token-1").unwrap(), None);
    // The house itself is not owned by the resident.
    assert!(persistence.get_house_by_id(house.id).is_ok());
}

#[test]
fn test_delete_user_tolerates_missing_profiles() {
    let mut persistence: Persistence = create_test_persistence();
    persistence.register_user("7001234567", "Secret1").unwrap();

    persistence.delete_user("7001234567").unwrap();

    assert!(!persistence.credential_exists("7001234567").unwrap());
}

#[test]
fn test_delete_unknown_user_removes_nothing() {
    let mut persistence: Persistence = create_test_persistence();
    // A resident row whose phone has no credential must survive.
    let _ = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");

    let result: Result<(), PersistenceError> = persistence.delete_user("7001234567");

    assert!(matches!(
        result,
        Err(PersistenceError::CredentialNotFound(_))
    ));
    assert!(persistence.get_resident_by_phone("7001234567").is_ok());
}
