// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login, logout and account management.

use hoa_tickets_domain::{
    PageMeta, PageRequest, Resident, StaffMember, USER_PAGE_LIMITS, User, validate_full_name,
    validate_phone_number,
};
use hoa_tickets_persistence::{Persistence, PersistenceError, RegisteredAccount};
use tracing::{debug, info};

use super::{optional_field, require_field};
use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    ListUsersRequest, ListUsersResponse, LoginRequest, LoginResponse, MessageResponse,
    RegisterAccountRequest, RegisterAccountResponse, UserDetailsResponse,
};

/// A login form that passed validation. Nothing has been read from
/// storage yet.
#[derive(Debug)]
pub struct LoginAttempt {
    phone_number: String,
    password: String,
}

impl LoginAttempt {
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }
}

/// A login whose password matched the stored hash.
///
/// Only [`check_login_password`] produces one, so a session can only be
/// opened after a successful password check.
#[derive(Debug)]
pub struct VerifiedLogin {
    phone_number: String,
}

/// Validates a login form without touching storage.
///
/// The password must satisfy the same policy as at registration, so a
/// malformed one is rejected before any hash comparison.
///
/// # Errors
///
/// Returns `InvalidInput` for a missing or malformed phone number or a
/// missing password, and `PasswordPolicyViolation` for a malformed
/// password.
pub fn validate_login(request: &LoginRequest) -> Result<LoginAttempt, ApiError> {
    let phone_number: &str = require_field("phoneNumber", request.phone_number.as_deref())?;
    let password: &str = require_field("password", request.password.as_deref())?;
    validate_phone_number(phone_number).map_err(translate_domain_error)?;
    PasswordPolicy::default().validate(password)?;

    Ok(LoginAttempt {
        phone_number: phone_number.to_string(),
        password: password.to_string(),
    })
}

/// Loads the stored password hash for a login attempt.
///
/// # Errors
///
/// Returns `AuthenticationFailed` if the phone number is not registered.
pub fn load_login_hash(
    persistence: &mut Persistence,
    attempt: &LoginAttempt,
) -> Result<String, ApiError> {
    Ok(AuthenticationService::stored_password_hash(
        persistence,
        &attempt.phone_number,
    )?)
}

/// Checks a login attempt's password against its stored hash.
///
/// This is the bcrypt step and needs no storage.
///
/// # Errors
///
/// Returns `AuthenticationFailed` if the password does not match.
pub fn check_login_password(
    attempt: LoginAttempt,
    password_hash: &str,
) -> Result<VerifiedLogin, ApiError> {
    AuthenticationService::verify_password(
        &attempt.phone_number,
        &attempt.password,
        password_hash,
    )?;
    Ok(VerifiedLogin {
        phone_number: attempt.phone_number,
    })
}

/// Opens a session for a verified login.
///
/// # Errors
///
/// Returns `Unauthorized` if the user holds neither a resident nor a staff
/// profile, or `Internal` if the session cannot be stored.
pub fn open_session(
    persistence: &mut Persistence,
    login: &VerifiedLogin,
) -> Result<LoginResponse, ApiError> {
    let (session_token, actor): (String, AuthenticatedActor) =
        AuthenticationService::open_session(persistence, &login.phone_number)?;

    Ok(LoginResponse {
        message: actor.phone_number,
        role: actor.role.as_str().to_string(),
        session_token,
    })
}

/// Logs a user in and opens a session.
///
/// Runs [`validate_login`], [`load_login_hash`], [`check_login_password`]
/// and [`open_session`] in order against one borrowed `persistence`.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The login form
///
/// # Errors
///
/// Returns an error if:
/// - The phone number or password is missing or malformed
/// - The credentials do not match
/// - The user holds neither a resident nor a staff profile
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let attempt: LoginAttempt = validate_login(request)?;
    let password_hash: String = load_login_hash(persistence, &attempt)?;
    let verified: VerifiedLogin = check_login_password(attempt, &password_hash)?;
    open_session(persistence, &verified)
}

/// Ends a session.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub fn logout(
    persistence: &mut Persistence,
    session_token: &str,
) -> Result<MessageResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(MessageResponse::success())
}

/// A registration form that passed authorization and validation.
#[derive(Debug)]
pub struct AccountRegistration {
    phone_number: String,
    password: String,
    full_name: String,
    as_resident: bool,
    as_staff: bool,
}

/// A validated registration whose password has been hashed.
#[derive(Debug)]
pub struct HashedRegistration {
    phone_number: String,
    password_hash: String,
    full_name: String,
    as_resident: bool,
    as_staff: bool,
}

impl AccountRegistration {
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Hashes the password at the given bcrypt cost.
    ///
    /// This is the expensive step and needs no storage.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if hashing fails.
    pub fn hash_password(self, cost: u32) -> Result<HashedRegistration, ApiError> {
        let password_hash: String = hoa_tickets_persistence::hash_password(&self.password, cost)
            .map_err(translate_persistence_error)?;

        Ok(HashedRegistration {
            phone_number: self.phone_number,
            password_hash,
            full_name: self.full_name,
            as_resident: self.as_resident,
            as_staff: self.as_staff,
        })
    }
}

/// Checks the actor's role and validates a registration form.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not staff
/// - A field is missing or malformed, or no role is ticked
pub fn validate_registration(
    request: &RegisterAccountRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<AccountRegistration, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "register_account")?;

    let phone_number: &str = require_field("phoneNumber", request.phone_number.as_deref())?;
    let password: &str = require_field("password", request.password.as_deref())?;
    let full_name: &str = require_field("fullName", request.full_name.as_deref())?;

    validate_phone_number(phone_number).map_err(translate_domain_error)?;
    PasswordPolicy::default().validate(password)?;
    validate_full_name(full_name).map_err(translate_domain_error)?;

    let as_resident: bool = is_checked(request.is_resident.as_deref());
    let as_staff: bool = is_checked(request.is_staff_member.as_deref());
    if !as_resident && !as_staff {
        return Err(ApiError::InvalidInput {
            field: String::from("role"),
            message: String::from("Select at least one of isResident or isStaffMember"),
        });
    }

    Ok(AccountRegistration {
        phone_number: phone_number.to_string(),
        password: password.to_string(),
        full_name: full_name.to_string(),
        as_resident,
        as_staff,
    })
}

/// Writes a hashed registration.
///
/// The credential and every requested profile are written in one
/// transaction.
///
/// # Errors
///
/// Returns `Conflict` if the phone number is already registered.
pub fn store_registration(
    persistence: &mut Persistence,
    registration: &HashedRegistration,
    authenticated_actor: &AuthenticatedActor,
) -> Result<RegisterAccountResponse, ApiError> {
    let account: RegisteredAccount = persistence
        .register_account_with_hash(
            &registration.phone_number,
            &registration.password_hash,
            &registration.full_name,
            registration.as_resident,
            registration.as_staff,
        )
        .map_err(translate_persistence_error)?;

    info!(
        phone_number = %registration.phone_number,
        as_resident = registration.as_resident,
        as_staff = registration.as_staff,
        registered_by = %authenticated_actor.phone_number,
        "Registered account"
    );

    Ok(RegisterAccountResponse {
        message: account.user.phone_number,
        resident: account.resident.map(Into::into),
        staff_member: account.staff_member.map(Into::into),
    })
}

/// Registers a login with a resident and/or staff profile.
///
/// Runs [`validate_registration`], [`AccountRegistration::hash_password`]
/// and [`store_registration`] in order against one borrowed
/// `persistence`.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The registration form
/// * `authenticated_actor` - The staff member performing the registration
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not staff
/// - A field is missing or malformed, or no role is ticked
/// - The phone number is already registered
pub fn register_account(
    persistence: &mut Persistence,
    request: &RegisterAccountRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<RegisterAccountResponse, ApiError> {
    let registration: AccountRegistration =
        validate_registration(request, authenticated_actor)?;
    let hashed: HashedRegistration =
        registration.hash_password(persistence.password_hash_cost())?;
    store_registration(persistence, &hashed, authenticated_actor)
}

/// Lists registered phone numbers.
///
/// # Errors
///
/// Returns an error if the actor is not staff or the query fails.
pub fn list_users(
    persistence: &mut Persistence,
    request: &ListUsersRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListUsersResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "list_users")?;

    let page: PageRequest = PageRequest::from_params(
        request.page.as_deref(),
        request.limit.as_deref(),
        USER_PAGE_LIMITS,
    );
    let phone_filter: &str = optional_field(request.phone_number.as_deref()).unwrap_or_default();

    let (users, total): (Vec<User>, i64) = persistence
        .list_users(phone_filter, page.limit, page.offset())
        .map_err(translate_persistence_error)?;
    let meta: PageMeta = page.meta(total);

    debug!(total, page = meta.page, "Listed users");

    Ok(ListUsersResponse {
        phones: users.into_iter().map(|u| u.phone_number).collect(),
        meta,
    })
}

/// Deletes a user with their profiles and sessions.
///
/// # Errors
///
/// Returns an error if the actor is not staff, the phone number is
/// malformed, or no such user exists.
pub fn delete_user(
    persistence: &mut Persistence,
    phone_number: &str,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "delete_user")?;
    validate_phone_number(phone_number).map_err(translate_domain_error)?;

    persistence
        .delete_user(phone_number)
        .map_err(|e| match e {
            PersistenceError::CredentialNotFound(_) => ApiError::ResourceNotFound {
                resource_type: String::from("User"),
                message: format!("No user with phone number {phone_number}"),
            },
            other => translate_persistence_error(other),
        })?;

    info!(
        phone_number,
        deleted_by = %authenticated_actor.phone_number,
        "Deleted user"
    );

    Ok(MessageResponse::success())
}

/// Returns the resident and staff profiles of a phone number.
///
/// # Errors
///
/// Returns an error if the actor is not staff or no such user exists.
pub fn get_user_details(
    persistence: &mut Persistence,
    phone_number: &str,
    authenticated_actor: &AuthenticatedActor,
) -> Result<UserDetailsResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "get_user_details")?;
    validate_phone_number(phone_number).map_err(translate_domain_error)?;

    let exists: bool = persistence
        .credential_exists(phone_number)
        .map_err(translate_persistence_error)?;
    if !exists {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("No user with phone number {phone_number}"),
        });
    }

    let resident: Option<Resident> = match persistence.get_resident_by_phone(phone_number) {
        Ok(resident) => Some(resident),
        Err(PersistenceError::ResidentNotFound(_)) => None,
        Err(e) => return Err(translate_persistence_error(e)),
    };

    let staff: Option<StaffMember> = match persistence.get_staff_member_by_phone(phone_number) {
        Ok(staff_member) => Some(staff_member),
        Err(PersistenceError::StaffMemberNotFound(_)) => None,
        Err(e) => return Err(translate_persistence_error(e)),
    };

    Ok(UserDetailsResponse {
        resident: resident.map(Into::into),
        staff: staff.map(Into::into),
    })
}

/// Interprets an HTML checkbox value.
fn is_checked(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("on" | "true" | "1"))
}
