// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff, specialization and organization management.

use hoa_tickets_domain::{
    DIRECTORY_PAGE_LIMITS, Organization, PageRequest, Specialization, StaffMember,
    validate_organization_name, validate_specialization_title,
};
use hoa_tickets_persistence::Persistence;
use tracing::{debug, info};

use super::{optional_field, require_field, require_numeric_id, require_opaque_id};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CreateOrganizationForm, CreateSpecializationForm, DirectoryQuery, LeastBusyQuery,
    LeastBusyResponse, ListOrganizationsResponse, ListSpecializationsResponse, MessageResponse,
    OrganizationRecord, SpecializationForm, SpecializationRecord, StaffMemberQuery,
    StaffSpecializationQuery, StaffSpecializationsResponse, UpdateOrganizationForm,
};

/// Lists a staff member's active specializations.
///
/// # Errors
///
/// Returns an error if the actor is not staff, the staff member ID is
/// missing or malformed, or the staff member does not exist.
pub fn get_staff_specializations(
    persistence: &mut Persistence,
    query: &StaffMemberQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<StaffSpecializationsResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "get_staff_specializations")?;
    let staff_member_id: i64 =
        require_numeric_id("staffMemberID", query.staff_member_id.as_deref())?;

    let staff_member: StaffMember = persistence
        .get_staff_member_by_id(staff_member_id)
        .map_err(translate_persistence_error)?;
    let specializations: Vec<Specialization> = persistence
        .find_current_specializations(staff_member.id)
        .map_err(translate_persistence_error)?;

    Ok(StaffSpecializationsResponse {
        specializations: specializations.into_iter().map(Into::into).collect(),
    })
}

/// Deactivates one of a staff member's specializations.
///
/// # Errors
///
/// Returns an error if the actor is not staff, an identifier is missing or
/// malformed, or the staff member does not hold the specialization.
pub fn delete_staff_specialization(
    persistence: &mut Persistence,
    query: &StaffSpecializationQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_staff_action(
        authenticated_actor,
        "delete_staff_specialization",
    )?;
    let specialization_id: &str = require_opaque_id("jobID", query.job_id.as_deref())?;
    let staff_member_id: i64 =
        require_numeric_id("staffMemberID", query.staff_member_id.as_deref())?;

    persistence
        .deactivate_staff_member_specialization(staff_member_id, specialization_id)
        .map_err(translate_persistence_error)?;

    info!(staff_member_id, specialization_id, "Deactivated specialization");
    Ok(MessageResponse::success())
}

/// Grants (or re-activates) a specialization for a staff member.
///
/// # Errors
///
/// Returns an error if the actor is not staff, an identifier is missing or
/// malformed, or either side does not exist.
pub fn add_staff_specialization(
    persistence: &mut Persistence,
    query: &StaffMemberQuery,
    form: &SpecializationForm,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "add_staff_specialization")?;
    let staff_member_id: i64 =
        require_numeric_id("staffMemberID", query.staff_member_id.as_deref())?;
    let specialization_id: &str =
        require_opaque_id("specializationID", form.specialization_id.as_deref())?;

    persistence
        .add_staff_member_specialization(staff_member_id, specialization_id)
        .map_err(translate_persistence_error)?;

    info!(staff_member_id, specialization_id, "Activated specialization");
    Ok(MessageResponse::success())
}

/// Lists organizations whose name contains `pattern`.
///
/// # Errors
///
/// Returns an error if the actor is not staff or the query fails.
pub fn list_organizations(
    persistence: &mut Persistence,
    query: &DirectoryQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListOrganizationsResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "list_organizations")?;

    let page: PageRequest = PageRequest::from_params(
        query.page.as_deref(),
        query.limit.as_deref(),
        DIRECTORY_PAGE_LIMITS,
    );
    let pattern: &str = optional_field(query.pattern.as_deref()).unwrap_or_default();

    let (organizations, total): (Vec<Organization>, i64) = persistence
        .list_organizations(pattern, page.limit, page.offset())
        .map_err(translate_persistence_error)?;

    Ok(ListOrganizationsResponse {
        organizations: organizations.into_iter().map(Into::into).collect(),
        meta: page.meta(total),
    })
}

/// Creates an organization.
///
/// # Errors
///
/// Returns an error if the actor is not staff, the name is missing, or
/// every ID generation attempt fails.
pub fn create_organization(
    persistence: &mut Persistence,
    form: &CreateOrganizationForm,
    authenticated_actor: &AuthenticatedActor,
) -> Result<OrganizationRecord, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "create_organization")?;
    let name: &str = require_field("name", form.name.as_deref())?;
    validate_organization_name(name).map_err(translate_domain_error)?;

    let organization: Organization = persistence
        .create_organization(name)
        .map_err(translate_persistence_error)?;

    info!(organization_id = %organization.id, name, "Created organization");
    Ok(organization.into())
}

/// Renames an organization.
///
/// # Errors
///
/// Returns an error if the actor is not staff, a field is missing, or the
/// organization does not exist.
pub fn update_organization(
    persistence: &mut Persistence,
    form: &UpdateOrganizationForm,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "update_organization")?;
    let organization_id: &str =
        require_opaque_id("organizationID", form.organization_id.as_deref())?;
    let name: &str = require_field("name", form.name.as_deref())?;
    validate_organization_name(name).map_err(translate_domain_error)?;

    persistence
        .update_organization(organization_id, name)
        .map_err(translate_persistence_error)?;

    info!(organization_id, name, "Renamed organization");
    Ok(MessageResponse::success())
}

/// Lists specializations whose title contains `pattern`.
///
/// # Errors
///
/// Returns an error if the actor is not staff or the query fails.
pub fn list_specializations(
    persistence: &mut Persistence,
    query: &DirectoryQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListSpecializationsResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "list_specializations")?;

    let page: PageRequest = PageRequest::from_params(
        query.page.as_deref(),
        query.limit.as_deref(),
        DIRECTORY_PAGE_LIMITS,
    );
    let pattern: &str = optional_field(query.pattern.as_deref()).unwrap_or_default();

    let (specializations, total): (Vec<Specialization>, i64) = persistence
        .list_specializations(pattern, page.limit, page.offset())
        .map_err(translate_persistence_error)?;

    Ok(ListSpecializationsResponse {
        specializations: specializations.into_iter().map(Into::into).collect(),
        meta: page.meta(total),
    })
}

/// Creates a specialization.
///
/// # Errors
///
/// Returns an error if the actor is not staff, the title is missing, or a
/// specialization with the title already exists.
pub fn create_specialization(
    persistence: &mut Persistence,
    form: &CreateSpecializationForm,
    authenticated_actor: &AuthenticatedActor,
) -> Result<SpecializationRecord, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "create_specialization")?;
    let title: &str = require_field("jobName", form.job_name.as_deref())?;
    validate_specialization_title(title).map_err(translate_domain_error)?;

    let specialization: Specialization = persistence
        .register_specialization(title)
        .map_err(translate_persistence_error)?;

    info!(specialization_id = %specialization.id, title, "Created specialization");
    Ok(specialization.into())
}

/// Finds the staff member holding a specialization with the fewest
/// assigned requests.
///
/// # Errors
///
/// Returns an error if the actor is not staff, the specialization ID is
/// missing, the specialization does not exist, or nobody holds it.
pub fn find_least_busy(
    persistence: &mut Persistence,
    query: &LeastBusyQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<LeastBusyResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "find_least_busy")?;
    let specialization_id: &str = require_opaque_id("jobID", query.job_id.as_deref())?;

    let specialization: Specialization = persistence
        .get_specialization_by_id(specialization_id)
        .map_err(translate_persistence_error)?;
    let staff_member: StaffMember = persistence
        .find_least_busy_by_specialization(&specialization.id)
        .map_err(translate_persistence_error)?;

    debug!(
        specialization_id,
        staff_member_id = staff_member.id,
        "Picked least busy staff member"
    );

    Ok(LeastBusyResponse {
        least_busy: staff_member.id,
        full_name: staff_member.full_name,
    })
}
