// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resident and house registry management.

use hoa_tickets_domain::{DIRECTORY_PAGE_LIMITS, House, PageRequest, Resident, validate_address};
use hoa_tickets_persistence::Persistence;
use tracing::info;

use super::{optional_field, require_field, require_numeric_id, require_opaque_id};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CreateHouseForm, DirectoryQuery, HouseForm, HouseRecord, ListHousesResponse, MessageResponse,
    ResidentHouseQuery, ResidentHousesResponse, ResidentPhoneResponse, ResidentQuery,
    UpdateHouseForm,
};

/// Lists the houses a resident is associated with.
///
/// # Errors
///
/// Returns an error if the actor is not staff, the resident ID is
/// missing, or the resident does not exist.
pub fn get_resident_houses(
    persistence: &mut Persistence,
    query: &ResidentQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ResidentHousesResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "get_resident_houses")?;
    let resident_id: &str = require_opaque_id("residentID", query.resident_id.as_deref())?;

    let resident: Resident = persistence
        .get_resident_by_id(resident_id)
        .map_err(translate_persistence_error)?;
    let houses: Vec<House> = persistence
        .find_resident_houses(&resident.id)
        .map_err(translate_persistence_error)?;

    Ok(ResidentHousesResponse {
        houses: houses.into_iter().map(Into::into).collect(),
    })
}

/// Removes a resident-house association.
///
/// # Errors
///
/// Returns an error if the actor is not staff, an identifier is missing or
/// malformed, or the pair is not associated.
pub fn remove_resident_house(
    persistence: &mut Persistence,
    query: &ResidentHouseQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "remove_resident_house")?;
    let resident_id: &str = require_opaque_id("residentID", query.resident_id.as_deref())?;
    let house_id: i64 = require_numeric_id("houseID", query.house_id.as_deref())?;

    persistence
        .delete_resident_house(resident_id, house_id)
        .map_err(translate_persistence_error)?;

    info!(resident_id, house_id, "Removed resident house");
    Ok(MessageResponse::success())
}

/// Associates a resident with a house. Repeating it succeeds.
///
/// # Errors
///
/// Returns an error if the actor is not staff, an identifier is missing or
/// malformed, or either side does not exist.
pub fn add_resident_house(
    persistence: &mut Persistence,
    query: &ResidentQuery,
    form: &HouseForm,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "add_resident_house")?;
    let resident_id: &str = require_opaque_id("residentID", query.resident_id.as_deref())?;
    let house_id: i64 = require_numeric_id("houseID", form.house_id.as_deref())?;

    persistence
        .add_resident_house(resident_id, house_id)
        .map_err(translate_persistence_error)?;

    info!(resident_id, house_id, "Added resident house");
    Ok(MessageResponse::success())
}

/// Changes a house's address.
///
/// # Errors
///
/// Returns an error if the actor is not staff, a field is missing or
/// invalid, the house does not exist, or the address is taken.
pub fn update_house(
    persistence: &mut Persistence,
    form: &UpdateHouseForm,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "update_house")?;
    let house_id: i64 = require_numeric_id("houseID", form.house_id.as_deref())?;
    let address: &str = require_field("address", form.address.as_deref())?;
    validate_address(address).map_err(translate_domain_error)?;

    persistence
        .update_house_address(house_id, address)
        .map_err(translate_persistence_error)?;

    info!(house_id, address, "Updated house address");
    Ok(MessageResponse::success())
}

/// Returns the phone number of a resident.
///
/// # Errors
///
/// Returns an error if the actor is not staff, the resident ID is missing,
/// or the resident does not exist.
pub fn get_resident_phone(
    persistence: &mut Persistence,
    query: &ResidentQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ResidentPhoneResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "get_resident_phone")?;
    let resident_id: &str = require_opaque_id("residentID", query.resident_id.as_deref())?;

    let resident: Resident = persistence
        .get_resident_by_id(resident_id)
        .map_err(translate_persistence_error)?;

    Ok(ResidentPhoneResponse {
        phone: resident.phone_number,
    })
}

/// Lists houses whose address contains `pattern`.
///
/// # Errors
///
/// Returns an error if the actor is not staff or the query fails.
pub fn list_houses(
    persistence: &mut Persistence,
    query: &DirectoryQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListHousesResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "list_houses")?;

    let page: PageRequest = PageRequest::from_params(
        query.page.as_deref(),
        query.limit.as_deref(),
        DIRECTORY_PAGE_LIMITS,
    );
    let pattern: &str = optional_field(query.pattern.as_deref()).unwrap_or_default();

    let (houses, total): (Vec<House>, i64) = persistence
        .list_houses(pattern, page.limit, page.offset())
        .map_err(translate_persistence_error)?;

    Ok(ListHousesResponse {
        houses: houses.into_iter().map(Into::into).collect(),
        meta: page.meta(total),
    })
}

/// Registers a new house.
///
/// # Errors
///
/// Returns an error if the actor is not staff, the address is missing, or
/// a house with the address already exists.
pub fn create_house(
    persistence: &mut Persistence,
    form: &CreateHouseForm,
    authenticated_actor: &AuthenticatedActor,
) -> Result<HouseRecord, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "create_house")?;
    let address: &str = require_field("address", form.address.as_deref())?;
    validate_address(address).map_err(translate_domain_error)?;

    let house: House = persistence
        .register_house(address)
        .map_err(translate_persistence_error)?;

    info!(house_id = house.id, address, "Registered house");
    Ok(house.into())
}
