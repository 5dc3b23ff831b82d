// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for account registration and user management.

use crate::{
    AccountRegistration, ApiError, HashedRegistration, ListUsersRequest, LoginRequest,
    RegisterAccountRequest, RegisterAccountResponse, UserDetailsResponse, delete_user,
    get_user_details, list_users, login, register_account, store_registration,
    validate_registration,
};

use super::helpers::{
    PASSWORD, RESIDENT_PHONE, STAFF_PHONE, create_test_resident, create_test_staff,
    seed_resident_with_house, seed_staff_member, setup_test_persistence,
};

fn registration(phone_number: &str, resident: bool, staff: bool) -> RegisterAccountRequest {
    RegisterAccountRequest {
        phone_number: Some(phone_number.to_string()),
        password: Some(String::from(PASSWORD)),
        full_name: Some(String::from("Jane Doe")),
        is_resident: resident.then(|| String::from("on")),
        is_staff_member: staff.then(|| String::from("on")),
    }
}

#[test]
fn test_register_resident_account() {
    let mut persistence = setup_test_persistence();

    let response: RegisterAccountResponse = register_account(
        &mut persistence,
        &registration(RESIDENT_PHONE, true, false),
        &create_test_staff(),
    )
    .unwrap();

    assert_eq!(response.message, RESIDENT_PHONE);
    let resident = response.resident.unwrap();
    assert_eq!(resident.phone_number, RESIDENT_PHONE);
    assert_eq!(resident.full_name, "Jane Doe");
    assert!(response.staff_member.is_none());
}

#[test]
fn test_registration_steps_hash_outside_storage() {
    let mut persistence = setup_test_persistence();
    let staff = create_test_staff();

    let registration: AccountRegistration =
        validate_registration(&registration(RESIDENT_PHONE, true, false), &staff).unwrap();
    assert_eq!(registration.phone_number(), RESIDENT_PHONE);

    let hashed: HashedRegistration = registration.hash_password(4).unwrap();
    let response: RegisterAccountResponse =
        store_registration(&mut persistence, &hashed, &staff).unwrap();

    assert_eq!(response.message, RESIDENT_PHONE);
    assert!(response.resident.is_some());
    let login_form: LoginRequest = LoginRequest {
        phone_number: Some(String::from(RESIDENT_PHONE)),
        password: Some(String::from(PASSWORD)),
    };
    assert!(login(&mut persistence, &login_form).is_ok());
}

#[test]
fn test_validate_registration_rejects_resident_before_hashing() {
    let result = validate_registration(
        &registration(RESIDENT_PHONE, true, false),
        &create_test_resident(RESIDENT_PHONE),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_register_account_with_both_roles() {
    let mut persistence = setup_test_persistence();

    let response: RegisterAccountResponse = register_account(
        &mut persistence,
        &registration(STAFF_PHONE, true, true),
        &create_test_staff(),
    )
    .unwrap();

    assert!(response.resident.is_some());
    let staff_member = response.staff_member.unwrap();
    assert_eq!(staff_member.status, "active");
}

#[test]
fn test_register_account_requires_a_role() {
    let mut persistence = setup_test_persistence();

    let result = register_account(
        &mut persistence,
        &registration(RESIDENT_PHONE, false, false),
        &create_test_staff(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "role"
    ));
    assert!(!persistence.credential_exists(RESIDENT_PHONE).unwrap());
}

#[test]
fn test_register_account_enforces_password_policy() {
    let mut persistence = setup_test_persistence();
    let mut request = registration(RESIDENT_PHONE, true, false);
    request.password = Some(String::from("abc"));

    let result = register_account(&mut persistence, &request, &create_test_staff());

    assert!(matches!(
        result,
        Err(ApiError::PasswordPolicyViolation { .. })
    ));
}

#[test]
fn test_register_account_validates_phone_and_name() {
    let mut persistence = setup_test_persistence();

    let mut bad_phone = registration("12-34", true, false);
    bad_phone.phone_number = Some(String::from("12-34"));
    assert!(matches!(
        register_account(&mut persistence, &bad_phone, &create_test_staff()),
        Err(ApiError::InvalidInput { field, .. }) if field == "phoneNumber"
    ));

    let mut no_name = registration(RESIDENT_PHONE, true, false);
    no_name.full_name = Some(String::from("   "));
    assert!(matches!(
        register_account(&mut persistence, &no_name, &create_test_staff()),
        Err(ApiError::InvalidInput { field, .. }) if field == "fullName"
    ));
}

#[test]
fn test_duplicate_registration_conflicts() {
    let mut persistence = setup_test_persistence();
    let request = registration(RESIDENT_PHONE, true, false);
    register_account(&mut persistence, &request, &create_test_staff()).unwrap();

    let result = register_account(&mut persistence, &request, &create_test_staff());

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_list_users_filters_and_pages() {
    let mut persistence = setup_test_persistence();
    seed_staff_member(&mut persistence, STAFF_PHONE);
    seed_staff_member(&mut persistence, "9000000002");
    seed_resident_with_house(&mut persistence, RESIDENT_PHONE, "Main St 1");

    let request = ListUsersRequest {
        page: Some(String::from("1")),
        limit: Some(String::from("1")),
        phone_number: Some(String::from("900000")),
    };
    let response = list_users(&mut persistence, &request, &create_test_staff()).unwrap();

    assert_eq!(response.phones.len(), 1);
    assert_eq!(response.meta.total, 2);
    assert_eq!(response.meta.limit, 1);
    assert_eq!(response.meta.pages, 2);
}

#[test]
fn test_user_details_returns_profiles() {
    let mut persistence = setup_test_persistence();
    seed_resident_with_house(&mut persistence, RESIDENT_PHONE, "Main St 1");

    let details: UserDetailsResponse =
        get_user_details(&mut persistence, RESIDENT_PHONE, &create_test_staff()).unwrap();

    assert_eq!(details.resident.unwrap().phone_number, RESIDENT_PHONE);
    assert!(details.staff.is_none());
}

#[test]
fn test_user_details_for_unknown_phone_is_not_found() {
    let mut persistence = setup_test_persistence();

    let result = get_user_details(&mut persistence, "5550000", &create_test_staff());

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_delete_user_removes_everything() {
    let mut persistence = setup_test_persistence();
    seed_resident_with_house(&mut persistence, RESIDENT_PHONE, "Main St 1");

    delete_user(&mut persistence, RESIDENT_PHONE, &create_test_staff()).unwrap();

    assert!(!persistence.credential_exists(RESIDENT_PHONE).unwrap());
    assert!(persistence.get_resident_by_phone(RESIDENT_PHONE).is_err());
}

#[test]
fn test_delete_unknown_user_is_not_found() {
    let mut persistence = setup_test_persistence();

    let result = delete_user(&mut persistence, "5550000", &create_test_staff());

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { resource_type, .. }) if resource_type == "User"
    ));
}
