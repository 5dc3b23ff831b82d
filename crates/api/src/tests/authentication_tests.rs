// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for login, session validation and logout.

use crate::{
    ApiError, AuthError, AuthenticatedActor, AuthenticationService, LoginAttempt, LoginRequest,
    LoginResponse, Role, VerifiedLogin, check_login_password, load_login_hash, login, logout,
    open_session, validate_login,
};

use super::helpers::{
    PASSWORD, RESIDENT_PHONE, STAFF_PHONE, seed_resident_with_house, seed_staff_member,
    setup_test_persistence,
};

const EXPIRED_AT: &str = "2000-01-01T00:00:00.000000Z";

fn login_form(phone_number: &str, password: &str) -> LoginRequest {
    LoginRequest {
        phone_number: Some(phone_number.to_string()),
        password: Some(password.to_string()),
    }
}

#[test]
fn test_staff_login_opens_staff_session() {
    let mut persistence = setup_test_persistence();
    seed_staff_member(&mut persistence, STAFF_PHONE);

    let response: LoginResponse =
        login(&mut persistence, &login_form(STAFF_PHONE, PASSWORD)).unwrap();

    assert_eq!(response.message, STAFF_PHONE);
    assert_eq!(response.role, "staff");
    assert_eq!(response.session_token.len(), 64);
    assert!(
        response
            .session_token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    );

    let actor: AuthenticatedActor =
        AuthenticationService::validate_session(&mut persistence, &response.session_token)
            .unwrap();
    assert_eq!(actor.phone_number, STAFF_PHONE);
    assert_eq!(actor.role, Role::Staff);
}

#[test]
fn test_resident_login_opens_resident_session() {
    let mut persistence = setup_test_persistence();
    seed_resident_with_house(&mut persistence, RESIDENT_PHONE, "Main St 1");

    let response: LoginResponse =
        login(&mut persistence, &login_form(RESIDENT_PHONE, PASSWORD)).unwrap();

    assert_eq!(response.role, "resident");
}

#[test]
fn test_staff_role_takes_precedence() {
    let mut persistence = setup_test_persistence();
    persistence
        .register_account(STAFF_PHONE, PASSWORD, "Both Roles", true, true)
        .unwrap();

    let response: LoginResponse =
        login(&mut persistence, &login_form(STAFF_PHONE, PASSWORD)).unwrap();

    assert_eq!(response.role, "staff");
}

#[test]
fn test_wrong_password_fails_authentication() {
    let mut persistence = setup_test_persistence();
    seed_staff_member(&mut persistence, STAFF_PHONE);

    let result = login(&mut persistence, &login_form(STAFF_PHONE, "Wrong1"));

    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_unknown_phone_fails_authentication() {
    let mut persistence = setup_test_persistence();

    let result = login(&mut persistence, &login_form("5550000", PASSWORD));

    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_login_without_any_role_is_forbidden() {
    let mut persistence = setup_test_persistence();
    persistence.register_user("5551234", PASSWORD).unwrap();

    let result = login(&mut persistence, &login_form("5551234", PASSWORD));

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_login_rejects_malformed_phone_number() {
    let mut persistence = setup_test_persistence();

    let result = login(&mut persistence, &login_form("12ab", PASSWORD));

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "phoneNumber"
    ));
}

#[test]
fn test_login_requires_password() {
    let mut persistence = setup_test_persistence();
    let form = LoginRequest {
        phone_number: Some(String::from(STAFF_PHONE)),
        password: None,
    };

    let result = login(&mut persistence, &form);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "password"
    ));
}

#[test]
fn test_login_rejects_malformed_password_before_storage() {
    let mut persistence = setup_test_persistence();

    for password in ["abc", "Secret 1", "Secret1!"] {
        let result = login(&mut persistence, &login_form("5550000", password));

        assert!(
            matches!(result, Err(ApiError::PasswordPolicyViolation { .. })),
            "{password} was not rejected by the policy"
        );
    }
}

#[test]
fn test_login_steps_verify_password_without_storage() {
    let mut persistence = setup_test_persistence();
    seed_staff_member(&mut persistence, STAFF_PHONE);

    let attempt: LoginAttempt = validate_login(&login_form(STAFF_PHONE, PASSWORD)).unwrap();
    assert_eq!(attempt.phone_number(), STAFF_PHONE);
    let password_hash: String = load_login_hash(&mut persistence, &attempt).unwrap();

    let verified: VerifiedLogin = check_login_password(attempt, &password_hash).unwrap();

    let response: LoginResponse = open_session(&mut persistence, &verified).unwrap();
    assert_eq!(response.role, "staff");
    let actor: AuthenticatedActor =
        AuthenticationService::validate_session(&mut persistence, &response.session_token)
            .unwrap();
    assert_eq!(actor.phone_number, STAFF_PHONE);
}

#[test]
fn test_login_steps_reject_wrong_password_and_unknown_phone_alike() {
    let mut persistence = setup_test_persistence();
    seed_staff_member(&mut persistence, STAFF_PHONE);

    let attempt: LoginAttempt = validate_login(&login_form(STAFF_PHONE, "Wrong1")).unwrap();
    let password_hash: String = load_login_hash(&mut persistence, &attempt).unwrap();
    let wrong_password: ApiError = check_login_password(attempt, &password_hash).unwrap_err();

    let unknown: LoginAttempt = validate_login(&login_form("5550000", PASSWORD)).unwrap();
    let unknown_phone: ApiError = load_login_hash(&mut persistence, &unknown).unwrap_err();

    assert!(matches!(wrong_password, ApiError::AuthenticationFailed { .. }));
    assert_eq!(wrong_password, unknown_phone);
}

#[test]
fn test_logout_invalidates_session() {
    let mut persistence = setup_test_persistence();
    seed_staff_member(&mut persistence, STAFF_PHONE);
    let response: LoginResponse =
        login(&mut persistence, &login_form(STAFF_PHONE, PASSWORD)).unwrap();

    logout(&mut persistence, &response.session_token).unwrap();

    let result = AuthenticationService::validate_session(&mut persistence, &response.session_token);
    assert!(matches!(result, Err(AuthError::AuthenticationFailed { .. })));

    // A second logout of the same session still succeeds.
    assert!(logout(&mut persistence, &response.session_token).is_ok());
}

#[test]
fn test_unknown_session_token_is_rejected() {
    let mut persistence = setup_test_persistence();

    let result = AuthenticationService::validate_session(&mut persistence, "no-such-token");

    assert!(matches!(result, Err(AuthError::AuthenticationFailed { .. })));
}

#[test]
fn test_expired_session_is_rejected_and_deleted() {
    let mut persistence = setup_test_persistence();
    persistence
        .create_session("expired-token", STAFF_PHONE, "staff", EXPIRED_AT)
        .unwrap();

    let result = AuthenticationService::validate_session(&mut persistence, "expired-token");

    assert_eq!(
        result,
        Err(AuthError::AuthenticationFailed {
            reason: String::from("Session expired"),
        })
    );
    assert!(
        persistence
            .get_session_by_token("expired-token")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_login_purges_expired_sessions() {
    let mut persistence = setup_test_persistence();
    seed_staff_member(&mut persistence, STAFF_PHONE);
    persistence
        .create_session("stale-token", "5550001", "resident", EXPIRED_AT)
        .unwrap();

    login(&mut persistence, &login_form(STAFF_PHONE, PASSWORD)).unwrap();

    assert!(
        persistence
            .get_session_by_token("stale-token")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_session_with_unknown_role_is_rejected() {
    let mut persistence = setup_test_persistence();
    persistence
        .create_session("odd-token", STAFF_PHONE, "janitor", "2999-01-01T00:00:00.000000Z")
        .unwrap();

    let result = AuthenticationService::validate_session(&mut persistence, "odd-token");

    assert!(matches!(result, Err(AuthError::AuthenticationFailed { .. })));
}
