// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the HOA maintenance ticketing system.
//!
//! This crate turns raw form and query values into validated domain
//! calls, enforces roles, and shapes results into response records. It
//! knows nothing about HTTP.

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
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use error::{AuthError, ApiError, translate_domain_error, translate_persistence_error};
pub use handlers::accounts::{
    AccountRegistration, HashedRegistration, LoginAttempt, VerifiedLogin, check_login_password,
    delete_user, get_user_details, list_users, load_login_hash, login, logout, open_session,
    register_account, store_registration, validate_login, validate_registration,
};
pub use handlers::requests::{
    create_request, delete_request, filter_requests, get_request_history, list_resident_requests,
    update_request,
};
pub use handlers::residents::{
    add_resident_house, create_house, get_resident_houses, get_resident_phone, list_houses,
    remove_resident_house, update_house,
};
pub use handlers::staff::{
    add_staff_specialization, create_organization, create_specialization,
    delete_staff_specialization, find_least_busy, get_staff_specializations, list_organizations,
    list_specializations, update_organization,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AuditEventRecord, CreateHouseForm, CreateOrganizationForm, CreateRequestForm,
    CreateSpecializationForm, DirectoryQuery, HouseForm, HouseRecord, LeastBusyQuery,
    LeastBusyResponse, ListHousesResponse, ListOrganizationsResponse, ListRequestsResponse,
    ListSpecializationsResponse, ListUsersRequest, ListUsersResponse, LoginRequest, LoginResponse,
    MessageResponse, OrganizationRecord, RegisterAccountRequest, RegisterAccountResponse,
    RequestHistoryResponse, RequestPanelQuery, RequestRecord, ResidentHouseQuery,
    ResidentHousesResponse, ResidentPhoneResponse, ResidentQuery, ResidentRecord,
    ResidentRequestsQuery, SpecializationForm, SpecializationRecord, StaffMemberQuery,
    StaffMemberRecord, StaffSpecializationQuery, StaffSpecializationsResponse,
    UpdateHouseForm, UpdateOrganizationForm, UpdateRequestForm, UpdateRequestResponse,
    UserDetailsResponse,
};
