// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Axum handlers.
//!
//! Each handler extracts the form or query, then runs the matching API
//! use case on the blocking pool through [`AppState::run_blocking`].
//! Login and registration split out their bcrypt step and run it through
//! [`AppState::run_unlocked`]. Handlers behind a role gate receive the
//! caller as an [`AuthenticatedActor`] extension.

use axum::{
    Extension, Json,
    extract::State as AxumState,
    http::{HeaderName, HeaderValue},
};
use hoa_tickets_api::{
    AccountRegistration, AuthenticatedActor, CreateHouseForm, CreateOrganizationForm,
    CreateRequestForm, CreateSpecializationForm, DirectoryQuery, HashedRegistration, HouseForm,
    HouseRecord, LeastBusyQuery, LeastBusyResponse, ListHousesResponse,
    ListOrganizationsResponse, ListRequestsResponse, ListSpecializationsResponse,
    ListUsersRequest, ListUsersResponse, LoginAttempt, LoginRequest, LoginResponse,
    MessageResponse, OrganizationRecord, RegisterAccountRequest, RegisterAccountResponse,
    RequestHistoryResponse, RequestPanelQuery, RequestRecord, ResidentHouseQuery,
    ResidentHousesResponse, ResidentPhoneResponse, ResidentQuery, ResidentRequestsQuery,
    SpecializationForm, SpecializationRecord, StaffMemberQuery, StaffSpecializationQuery,
    StaffSpecializationsResponse, UpdateHouseForm, UpdateOrganizationForm, UpdateRequestForm,
    UpdateRequestResponse, UserDetailsResponse, VerifiedLogin,
};
use tracing::info;

use crate::AppState;
use crate::error::HttpError;
use crate::extract::{ApiForm, ApiPath, ApiQuery};
use crate::session::{RequestContext, expired_session_cookie, session_cookie};

// ============================================================================
// Session
// ============================================================================

/// Handler for POST `/api/login`.
///
/// Sets the session cookie on success.
pub async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    ApiForm(form): ApiForm<LoginRequest>,
) -> Result<([(HeaderName, HeaderValue); 1], Json<LoginResponse>), HttpError> {
    let attempt: LoginAttempt = hoa_tickets_api::validate_login(&form)?;

    let (attempt, password_hash): (LoginAttempt, String) = app_state
        .run_blocking(move |persistence| {
            let password_hash: String = hoa_tickets_api::load_login_hash(persistence, &attempt)?;
            Ok((attempt, password_hash))
        })
        .await?;

    let verified: VerifiedLogin = app_state
        .run_unlocked(move || hoa_tickets_api::check_login_password(attempt, &password_hash))
        .await?;

    let response: LoginResponse = app_state
        .run_blocking(move |persistence| hoa_tickets_api::open_session(persistence, &verified))
        .await?;

    let cookie: (HeaderName, HeaderValue) = session_cookie(&response.session_token)?;
    Ok(([cookie], Json(response)))
}

/// Handler for GET `/logout`.
///
/// Deletes the server-side session, if any, and expires the cookie.
pub async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    Extension(context): Extension<RequestContext>,
) -> Result<([(HeaderName, HeaderValue); 1], Json<MessageResponse>), HttpError> {
    let response: MessageResponse = match context.session_token {
        Some(token) => {
            app_state
                .run_blocking(move |persistence| hoa_tickets_api::logout(persistence, &token))
                .await?
        }
        None => MessageResponse::success(),
    };

    if let Some(actor) = context.actor {
        info!(phone_number = %actor.phone_number, "User logged out");
    }

    Ok(([expired_session_cookie()], Json(response)))
}

// ============================================================================
// Resident area
// ============================================================================

/// Handler for GET `/resident/api/requests`.
pub async fn handle_list_resident_requests(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<ResidentRequestsQuery>,
) -> Result<Json<ListRequestsResponse>, HttpError> {
    let response: ListRequestsResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::list_resident_requests(persistence, &query, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/resident/api/create-request`.
pub async fn handle_create_request(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiForm(form): ApiForm<CreateRequestForm>,
) -> Result<Json<RequestRecord>, HttpError> {
    let response: RequestRecord = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::create_request(persistence, &form, &actor)
        })
        .await?;

    info!(request_id = %response.id, house_id = response.house_id, "Filed request");
    Ok(Json(response))
}

// ============================================================================
// Users
// ============================================================================

/// Handler for POST `/staff/api/register`.
pub async fn handle_register_account(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiForm(form): ApiForm<RegisterAccountRequest>,
) -> Result<Json<RegisterAccountResponse>, HttpError> {
    let registration: AccountRegistration =
        hoa_tickets_api::validate_registration(&form, &actor)?;

    let cost: u32 = app_state.password_hash_cost;
    let hashed: HashedRegistration = app_state
        .run_unlocked(move || registration.hash_password(cost))
        .await?;

    let response: RegisterAccountResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::store_registration(persistence, &hashed, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/staff/api/users/list`.
pub async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<ListUsersRequest>,
) -> Result<Json<ListUsersResponse>, HttpError> {
    let response: ListUsersResponse = app_state
        .run_blocking(move |persistence| hoa_tickets_api::list_users(persistence, &query, &actor))
        .await?;
    Ok(Json(response))
}

/// Handler for DELETE `/staff/api/users/delete/{phone}`.
pub async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiPath(phone_number): ApiPath<String>,
) -> Result<Json<MessageResponse>, HttpError> {
    let response: MessageResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::delete_user(persistence, &phone_number, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/staff/api/users/info/{phone}`.
pub async fn handle_get_user_details(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiPath(phone_number): ApiPath<String>,
) -> Result<Json<UserDetailsResponse>, HttpError> {
    let response: UserDetailsResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::get_user_details(persistence, &phone_number, &actor)
        })
        .await?;
    Ok(Json(response))
}

// ============================================================================
// Residents
// ============================================================================

/// Handler for GET `/staff/api/users/resident/info`.
pub async fn handle_get_resident_houses(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<ResidentQuery>,
) -> Result<Json<ResidentHousesResponse>, HttpError> {
    let response: ResidentHousesResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::get_resident_houses(persistence, &query, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for DELETE `/staff/api/users/resident/remove-house`.
pub async fn handle_remove_resident_house(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<ResidentHouseQuery>,
) -> Result<Json<MessageResponse>, HttpError> {
    let response: MessageResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::remove_resident_house(persistence, &query, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/staff/api/users/resident/add-house`.
pub async fn handle_add_resident_house(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<ResidentQuery>,
    ApiForm(form): ApiForm<HouseForm>,
) -> Result<Json<MessageResponse>, HttpError> {
    let response: MessageResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::add_resident_house(persistence, &query, &form, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/staff/api/users/resident/update-house`.
pub async fn handle_update_house(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiForm(form): ApiForm<UpdateHouseForm>,
) -> Result<Json<MessageResponse>, HttpError> {
    let response: MessageResponse = app_state
        .run_blocking(move |persistence| hoa_tickets_api::update_house(persistence, &form, &actor))
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/staff/api/users/resident/get-number`.
pub async fn handle_get_resident_phone(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<ResidentQuery>,
) -> Result<Json<ResidentPhoneResponse>, HttpError> {
    let response: ResidentPhoneResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::get_resident_phone(persistence, &query, &actor)
        })
        .await?;
    Ok(Json(response))
}

// ============================================================================
// Staff members
// ============================================================================

/// Handler for GET `/staff/api/users/staff/info`.
pub async fn handle_get_staff_specializations(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<StaffMemberQuery>,
) -> Result<Json<StaffSpecializationsResponse>, HttpError> {
    let response: StaffSpecializationsResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::get_staff_specializations(persistence, &query, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for DELETE `/staff/api/users/staff/delete-spec`.
pub async fn handle_delete_staff_specialization(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<StaffSpecializationQuery>,
) -> Result<Json<MessageResponse>, HttpError> {
    let response: MessageResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::delete_staff_specialization(persistence, &query, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/staff/api/users/staff/add-specialization`.
pub async fn handle_add_staff_specialization(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<StaffMemberQuery>,
    ApiForm(form): ApiForm<SpecializationForm>,
) -> Result<Json<MessageResponse>, HttpError> {
    let response: MessageResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::add_staff_specialization(persistence, &query, &form, &actor)
        })
        .await?;
    Ok(Json(response))
}

// ============================================================================
// Organizations, specializations and houses
// ============================================================================

/// Handler for GET `/staff/api/organizations/list`.
pub async fn handle_list_organizations(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<DirectoryQuery>,
) -> Result<Json<ListOrganizationsResponse>, HttpError> {
    let response: ListOrganizationsResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::list_organizations(persistence, &query, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/staff/api/organizations/create`.
pub async fn handle_create_organization(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiForm(form): ApiForm<CreateOrganizationForm>,
) -> Result<Json<OrganizationRecord>, HttpError> {
    let response: OrganizationRecord = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::create_organization(persistence, &form, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/staff/api/organizations/update`.
pub async fn handle_update_organization(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiForm(form): ApiForm<UpdateOrganizationForm>,
) -> Result<Json<MessageResponse>, HttpError> {
    let response: MessageResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::update_organization(persistence, &form, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/staff/api/specializations/list`.
pub async fn handle_list_specializations(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<DirectoryQuery>,
) -> Result<Json<ListSpecializationsResponse>, HttpError> {
    let response: ListSpecializationsResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::list_specializations(persistence, &query, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/staff/api/specializations/create`.
pub async fn handle_create_specialization(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiForm(form): ApiForm<CreateSpecializationForm>,
) -> Result<Json<SpecializationRecord>, HttpError> {
    let response: SpecializationRecord = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::create_specialization(persistence, &form, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/staff/api/houses/list`.
pub async fn handle_list_houses(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<DirectoryQuery>,
) -> Result<Json<ListHousesResponse>, HttpError> {
    let response: ListHousesResponse = app_state
        .run_blocking(move |persistence| hoa_tickets_api::list_houses(persistence, &query, &actor))
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/staff/api/houses/create`.
pub async fn handle_create_house(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiForm(form): ApiForm<CreateHouseForm>,
) -> Result<Json<HouseRecord>, HttpError> {
    let response: HouseRecord = app_state
        .run_blocking(move |persistence| hoa_tickets_api::create_house(persistence, &form, &actor))
        .await?;
    Ok(Json(response))
}

// ============================================================================
// Request panel
// ============================================================================

/// Handler for GET `/staff/api/requests/panel`.
pub async fn handle_filter_requests(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<RequestPanelQuery>,
) -> Result<Json<ListRequestsResponse>, HttpError> {
    let response: ListRequestsResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::filter_requests(persistence, &query, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/staff/api/requests/panel/update`.
pub async fn handle_update_request(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiForm(form): ApiForm<UpdateRequestForm>,
) -> Result<Json<UpdateRequestResponse>, HttpError> {
    let response: UpdateRequestResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::update_request(persistence, &form, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/staff/api/requests/panel/update/random-assign`.
pub async fn handle_find_least_busy(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiQuery(query): ApiQuery<LeastBusyQuery>,
) -> Result<Json<LeastBusyResponse>, HttpError> {
    let response: LeastBusyResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::find_least_busy(persistence, &query, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for DELETE `/staff/api/requests/panel/delete/{id}`.
pub async fn handle_delete_request(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiPath(request_id): ApiPath<String>,
) -> Result<Json<MessageResponse>, HttpError> {
    let response: MessageResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::delete_request(persistence, &request_id, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/staff/api/requests/panel/history/{id}`.
pub async fn handle_get_request_history(
    AxumState(app_state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedActor>,
    ApiPath(request_id): ApiPath<String>,
) -> Result<Json<RequestHistoryResponse>, HttpError> {
    let response: RequestHistoryResponse = app_state
        .run_blocking(move |persistence| {
            hoa_tickets_api::get_request_history(persistence, &request_id, &actor)
        })
        .await?;
    Ok(Json(response))
}
