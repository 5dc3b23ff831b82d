// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maintenance request (ticket) use cases.
//!
//! Residents file requests against houses they are associated with and
//! page through their own requests. Staff filter, rewrite and delete any
//! request from the panel, and can read a request's audit trail.

use hoa_tickets_audit::AuditEvent;
use hoa_tickets_domain::{
    NewRequest, PageMeta, PageRequest, RESIDENT_REQUEST_PAGE_LIMITS, Request, RequestFilter,
    RequestSort, RequestStatus, RequestType, Resident, ResidentRequestSort,
    STAFF_REQUEST_PAGE_LIMITS, parse_numeric_id, validate_complaint, validate_cost,
};
use hoa_tickets_persistence::{Persistence, PersistenceError};
use tracing::{debug, info, warn};

use super::{optional_field, require_field, require_numeric_id, require_opaque_id};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CreateRequestForm, ListRequestsResponse, MessageResponse, RequestHistoryResponse,
    RequestPanelQuery, RequestRecord, ResidentRequestsQuery, UpdateRequestForm,
    UpdateRequestResponse,
};

/// Lists the caller's own requests.
///
/// The caller is resolved from the session phone number. A staff member
/// without a resident profile gets an empty page.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_resident_requests(
    persistence: &mut Persistence,
    query: &ResidentRequestsQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListRequestsResponse, ApiError> {
    AuthorizationService::authorize_resident_action(authenticated_actor, "list_requests")?;

    let page: PageRequest = PageRequest::from_params(
        query.page.as_deref(),
        query.limit.as_deref(),
        RESIDENT_REQUEST_PAGE_LIMITS,
    );
    let sort: ResidentRequestSort = ResidentRequestSort::from_key(query.sort.as_deref());

    let (requests, total): (Vec<Request>, i64) = persistence
        .list_resident_requests(
            &authenticated_actor.phone_number,
            sort,
            page.limit,
            page.offset(),
        )
        .map_err(translate_persistence_error)?;

    build_page(requests, page.meta(total))
}

/// Files a new request for a house the caller is associated with.
///
/// Ownership is checked before anything is written.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `form` - The creation form
/// * `authenticated_actor` - The filing resident
///
/// # Errors
///
/// Returns an error if:
/// - A field is missing or malformed
/// - The caller has no resident profile or is not associated with the house
/// - Every ID generation attempt fails
pub fn create_request(
    persistence: &mut Persistence,
    form: &CreateRequestForm,
    authenticated_actor: &AuthenticatedActor,
) -> Result<RequestRecord, ApiError> {
    AuthorizationService::authorize_resident_action(authenticated_actor, "create_request")?;

    let house_id: i64 = require_numeric_id("houseID", form.house_id.as_deref())?;
    let request_type: RequestType = require_field("requestType", form.request_type.as_deref())?
        .parse()
        .map_err(translate_domain_error)?;
    let complaint: &str = require_field("complaint", form.complaint.as_deref())?;
    validate_complaint(complaint).map_err(translate_domain_error)?;

    let resident: Resident = match persistence
        .get_resident_by_phone(&authenticated_actor.phone_number)
    {
        Ok(resident) => resident,
        Err(PersistenceError::ResidentNotFound(_)) => return Err(no_permission()),
        Err(e) => return Err(translate_persistence_error(e)),
    };

    let owns_house: bool = persistence
        .validate_resident_house(&resident.id, house_id)
        .map_err(translate_persistence_error)?;
    if !owns_house {
        warn!(
            resident_id = %resident.id,
            house_id,
            "Rejected request for a house the resident is not associated with"
        );
        return Err(no_permission());
    }

    let new_request: NewRequest = NewRequest {
        resident_id: resident.id,
        house_id,
        request_type,
        complaint: complaint.to_string(),
    };
    let request: Request = persistence
        .create_request(&new_request, &authenticated_actor.to_audit_actor())
        .map_err(translate_persistence_error)?;

    RequestRecord::try_from(request)
}

/// Lists requests matching the staff panel filter.
///
/// Malformed `type`, `status`, `houseID` and `responsibleID` values are
/// dropped from the filter.
///
/// # Errors
///
/// Returns an error if the actor is not staff or the query fails.
pub fn filter_requests(
    persistence: &mut Persistence,
    query: &RequestPanelQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListRequestsResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "filter_requests")?;

    let page: PageRequest = PageRequest::from_params(
        query.page.as_deref(),
        query.limit.as_deref(),
        STAFF_REQUEST_PAGE_LIMITS,
    );
    let filter: RequestFilter = build_filter(query, &page);

    let (requests, total): (Vec<Request>, i64) = persistence
        .filter_requests(&filter)
        .map_err(translate_persistence_error)?;

    build_page(requests, page.meta(total))
}

/// Rewrites a request from the staff panel.
///
/// Every referenced resident, house, staff member and organization must
/// exist. The status change is recorded in the audit trail.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not staff
/// - A field is missing or malformed
/// - The request or a referenced row does not exist
/// - The status transition is not permitted
pub fn update_request(
    persistence: &mut Persistence,
    form: &UpdateRequestForm,
    authenticated_actor: &AuthenticatedActor,
) -> Result<UpdateRequestResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "update_request")?;

    let request_id: &str = require_opaque_id("id", form.id.as_deref())?;
    let resident_id: &str = require_opaque_id("residentID", form.resident_id.as_deref())?;
    let house_id: i64 = require_numeric_id("houseID", form.house_id.as_deref())?;
    let request_type: RequestType = require_field("type", form.request_type.as_deref())?
        .parse()
        .map_err(translate_domain_error)?;
    let complaint: &str = require_field("complaint", form.complaint.as_deref())?;
    validate_complaint(complaint).map_err(translate_domain_error)?;
    let status: RequestStatus = require_field("status", form.status.as_deref())?
        .parse()
        .map_err(translate_domain_error)?;
    let cost: Option<f64> = parse_cost(form.cost.as_deref())?;
    let responsible_id: Option<i64> = optional_field(form.responsible_id.as_deref())
        .map(|raw| parse_numeric_id("respID", raw))
        .transpose()
        .map_err(translate_domain_error)?;
    let organization_id: Option<&str> = optional_field(form.organization_id.as_deref());

    let existing: Request = persistence
        .get_request_by_id(request_id)
        .map_err(translate_persistence_error)?;
    existing
        .status
        .validate_transition(status)
        .map_err(translate_domain_error)?;

    persistence
        .get_resident_by_id(resident_id)
        .map_err(translate_persistence_error)?;
    persistence
        .get_house_by_id(house_id)
        .map_err(translate_persistence_error)?;
    if let Some(staff_member_id) = responsible_id {
        persistence
            .get_staff_member_by_id(staff_member_id)
            .map_err(translate_persistence_error)?;
    }
    if let Some(organization_id) = organization_id {
        persistence
            .get_organization_by_id(organization_id)
            .map_err(translate_persistence_error)?;
    }

    let updated: Request = Request {
        id: existing.id,
        resident_id: resident_id.to_string(),
        house_id,
        request_type,
        complaint: complaint.to_string(),
        cost,
        status,
        responsible_id,
        organization_id: organization_id.map(str::to_string),
        created_at: existing.created_at,
    };

    persistence
        .update_request(&updated, &authenticated_actor.to_audit_actor())
        .map_err(translate_persistence_error)?;

    Ok(UpdateRequestResponse {
        message: String::from("success"),
        responsible_id: updated.responsible_id,
        status: updated.status.as_str().to_string(),
    })
}

/// Deletes a request.
///
/// # Errors
///
/// Returns an error if the actor is not staff or the request does not
/// exist.
pub fn delete_request(
    persistence: &mut Persistence,
    request_id: &str,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "delete_request")?;
    let request_id: &str = require_opaque_id("id", Some(request_id))?;

    persistence
        .delete_request(request_id)
        .map_err(translate_persistence_error)?;

    info!(
        request_id,
        deleted_by = %authenticated_actor.phone_number,
        "Deleted request"
    );

    Ok(MessageResponse {
        message: format!("deleted {request_id}"),
    })
}

/// Returns a request's audit trail, oldest first.
///
/// # Errors
///
/// Returns an error if the actor is not staff or the request does not
/// exist.
pub fn get_request_history(
    persistence: &mut Persistence,
    request_id: &str,
    authenticated_actor: &AuthenticatedActor,
) -> Result<RequestHistoryResponse, ApiError> {
    AuthorizationService::authorize_staff_action(authenticated_actor, "get_request_history")?;
    let request_id: &str = require_opaque_id("id", Some(request_id))?;

    let request: Request = persistence
        .get_request_by_id(request_id)
        .map_err(translate_persistence_error)?;
    let events: Vec<AuditEvent> = persistence
        .get_request_history(&request.id)
        .map_err(translate_persistence_error)?;

    Ok(RequestHistoryResponse {
        request_id: request.id,
        events: events.into_iter().map(Into::into).collect(),
    })
}

/// Converts the panel query into a storage filter.
fn build_filter(query: &RequestPanelQuery, page: &PageRequest) -> RequestFilter {
    let request_type: Option<RequestType> =
        optional_field(query.request_type.as_deref()).and_then(|raw| {
            raw.parse()
                .inspect_err(|e| debug!(error = %e, "Ignoring request type filter"))
                .ok()
        });
    let status: Option<RequestStatus> = optional_field(query.status.as_deref()).and_then(|raw| {
        raw.parse()
            .inspect_err(|e| debug!(error = %e, "Ignoring status filter"))
            .ok()
    });
    let house_id: Option<i64> = optional_field(query.house_id.as_deref()).and_then(|raw| {
        parse_numeric_id("houseID", raw)
            .inspect_err(|e| debug!(error = %e, "Ignoring house filter"))
            .ok()
    });
    let responsible_id: Option<i64> =
        optional_field(query.responsible_id.as_deref()).and_then(|raw| {
            parse_numeric_id("responsibleID", raw)
                .inspect_err(|e| debug!(error = %e, "Ignoring responsible filter"))
                .ok()
        });

    RequestFilter {
        id: optional_field(query.id.as_deref()).map(str::to_string),
        resident_id: optional_field(query.resident_id.as_deref()).map(str::to_string),
        organization_id: optional_field(query.organization_id.as_deref()).map(str::to_string),
        complaint: optional_field(query.complaint.as_deref()).map(str::to_string),
        request_type,
        status,
        house_id,
        responsible_id,
        sort: RequestSort::from_key(query.sort.as_deref()),
        limit: page.limit,
        offset: page.offset(),
    }
}

/// Parses an optional repair cost.
fn parse_cost(raw: Option<&str>) -> Result<Option<f64>, ApiError> {
    let Some(raw) = optional_field(raw) else {
        return Ok(None);
    };

    let cost: f64 = raw.parse::<f64>().map_err(|_| ApiError::InvalidInput {
        field: String::from("cost"),
        message: format!("'{raw}' is not a number"),
    })?;
    validate_cost(cost).map_err(translate_domain_error)?;
    Ok(Some(cost))
}

fn build_page(requests: Vec<Request>, meta: PageMeta) -> Result<ListRequestsResponse, ApiError> {
    let requests: Vec<RequestRecord> = requests
        .into_iter()
        .map(RequestRecord::try_from)
        .collect::<Result<Vec<RequestRecord>, ApiError>>()?;
    Ok(ListRequestsResponse { requests, meta })
}

fn no_permission() -> ApiError {
    ApiError::Unauthorized {
        action: String::from("create_request"),
        required_role: String::from("resident of the house"),
    }
}
