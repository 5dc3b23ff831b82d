// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Request DTOs carry raw form and query values (`Option<String>`); the
//! handlers validate and parse them. Response DTOs are the JSON wire
//! contract and are distinct from the domain types.

use hoa_tickets_audit::AuditEvent;
use hoa_tickets_domain::{
    House, Organization, PageMeta, Request, Resident, Specialization, StaffMember,
};
use time::format_description::well_known::Rfc3339;

use crate::error::ApiError;

// ============================================================================
// Requests
// ============================================================================

/// Login form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone_number: Option<String>,
    pub password: Option<String>,
}

/// Account registration form.
///
/// Role checkboxes are `"on"` when ticked.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterAccountRequest {
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub is_resident: Option<String>,
    pub is_staff_member: Option<String>,
}

/// Paging and substring filter for directory listings (houses,
/// organizations, specializations).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct DirectoryQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub pattern: Option<String>,
}

/// Paging and phone filter for the user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListUsersRequest {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub phone_number: Option<String>,
}

/// Paging and sort for a resident's own requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ResidentRequestsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// Request creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateRequestForm {
    #[serde(rename = "houseID")]
    pub house_id: Option<String>,
    pub request_type: Option<String>,
    pub complaint: Option<String>,
}

/// Staff request panel filter.
///
/// Invalid `type`, `status`, `houseID` and `responsibleID` values are
/// ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct RequestPanelQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub id: Option<String>,
    #[serde(rename = "residentID")]
    pub resident_id: Option<String>,
    #[serde(rename = "organizationID")]
    pub organization_id: Option<String>,
    pub complaint: Option<String>,
    #[serde(rename = "type")]
    pub request_type: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "houseID")]
    pub house_id: Option<String>,
    #[serde(rename = "responsibleID")]
    pub responsible_id: Option<String>,
}

/// Full request update form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct UpdateRequestForm {
    pub id: Option<String>,
    #[serde(rename = "residentID")]
    pub resident_id: Option<String>,
    #[serde(rename = "houseID")]
    pub house_id: Option<String>,
    #[serde(rename = "type")]
    pub request_type: Option<String>,
    pub complaint: Option<String>,
    pub cost: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "respID")]
    pub responsible_id: Option<String>,
    #[serde(rename = "organizationID")]
    pub organization_id: Option<String>,
}

/// Selects a resident.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ResidentQuery {
    #[serde(rename = "residentID")]
    pub resident_id: Option<String>,
}

/// Selects a resident-house association.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ResidentHouseQuery {
    #[serde(rename = "residentID")]
    pub resident_id: Option<String>,
    #[serde(rename = "houseID")]
    pub house_id: Option<String>,
}

/// Names a house in a form body.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct HouseForm {
    #[serde(rename = "houseID")]
    pub house_id: Option<String>,
}

/// House address change form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct UpdateHouseForm {
    #[serde(rename = "houseID")]
    pub house_id: Option<String>,
    pub address: Option<String>,
}

/// House creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct CreateHouseForm {
    pub address: Option<String>,
}

/// Selects a staff member.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct StaffMemberQuery {
    #[serde(rename = "staffMemberID")]
    pub staff_member_id: Option<String>,
}

/// Selects a staff member's specialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct StaffSpecializationQuery {
    #[serde(rename = "jobID")]
    pub job_id: Option<String>,
    #[serde(rename = "staffMemberID")]
    pub staff_member_id: Option<String>,
}

/// Names a specialization in a form body.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct SpecializationForm {
    #[serde(rename = "specializationID")]
    pub specialization_id: Option<String>,
}

/// Specialization creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateSpecializationForm {
    pub job_name: Option<String>,
}

/// Organization creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct CreateOrganizationForm {
    pub name: Option<String>,
}

/// Organization rename form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct UpdateOrganizationForm {
    #[serde(rename = "organizationID")]
    pub organization_id: Option<String>,
    pub name: Option<String>,
}

/// Selects a specialization for least-busy assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct LeastBusyQuery {
    #[serde(rename = "jobID")]
    pub job_id: Option<String>,
}

// ============================================================================
// Records
// ============================================================================

/// Wire form of a resident.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentRecord {
    pub id: String,
    pub phone_number: String,
    pub full_name: String,
}

impl From<Resident> for ResidentRecord {
    fn from(resident: Resident) -> Self {
        Self {
            id: resident.id,
            phone_number: resident.phone_number,
            full_name: resident.full_name,
        }
    }
}

/// Wire form of a staff member.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMemberRecord {
    pub id: i64,
    pub phone_number: String,
    pub full_name: String,
    pub status: String,
}

impl From<StaffMember> for StaffMemberRecord {
    fn from(staff_member: StaffMember) -> Self {
        Self {
            id: staff_member.id,
            phone_number: staff_member.phone_number,
            full_name: staff_member.full_name,
            status: staff_member.status.as_str().to_string(),
        }
    }
}

/// Wire form of a house.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HouseRecord {
    pub id: i64,
    pub address: String,
}

impl From<House> for HouseRecord {
    fn from(house: House) -> Self {
        Self {
            id: house.id,
            address: house.address,
        }
    }
}

/// Wire form of a specialization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpecializationRecord {
    pub id: String,
    pub title: String,
}

impl From<Specialization> for SpecializationRecord {
    fn from(specialization: Specialization) -> Self {
        Self {
            id: specialization.id,
            title: specialization.title,
        }
    }
}

/// Wire form of an organization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrganizationRecord {
    pub id: String,
    pub name: String,
}

impl From<Organization> for OrganizationRecord {
    fn from(organization: Organization) -> Self {
        Self {
            id: organization.id,
            name: organization.name,
        }
    }
}

/// Wire form of a maintenance request.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    pub id: String,
    #[serde(rename = "residentID")]
    pub resident_id: String,
    #[serde(rename = "houseID")]
    pub house_id: i64,
    #[serde(rename = "type")]
    pub request_type: String,
    pub complaint: String,
    pub cost: Option<f64>,
    pub status: String,
    #[serde(rename = "responsibleID")]
    pub responsible_id: Option<i64>,
    #[serde(rename = "organizationID")]
    pub organization_id: Option<String>,
    /// RFC 3339 creation time.
    pub created_at: String,
}

impl TryFrom<Request> for RequestRecord {
    type Error = ApiError;

    fn try_from(request: Request) -> Result<Self, Self::Error> {
        let created_at: String = request
            .created_at
            .format(&Rfc3339)
            .map_err(|e| ApiError::Internal {
                message: format!("Timestamp formatting failed: {e}"),
            })?;

        Ok(Self {
            id: request.id,
            resident_id: request.resident_id,
            house_id: request.house_id,
            request_type: request.request_type.as_str().to_string(),
            complaint: request.complaint,
            cost: request.cost,
            status: request.status.as_str().to_string(),
            responsible_id: request.responsible_id,
            organization_id: request.organization_id,
            created_at,
        })
    }
}

/// Wire form of one audit trail entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEventRecord {
    pub event_id: Option<i64>,
    pub actor_phone_number: String,
    pub actor_role: String,
    pub action: String,
    pub before_status: Option<String>,
    pub after_status: String,
    pub details: Option<String>,
    pub recorded_at: Option<String>,
}

impl From<AuditEvent> for AuditEventRecord {
    fn from(event: AuditEvent) -> Self {
        Self {
            event_id: event.event_id,
            actor_phone_number: event.actor.id,
            actor_role: event.actor.actor_type,
            action: event.action.as_str().to_string(),
            before_status: event.change.before.map(|s| s.as_str().to_string()),
            after_status: event.change.after.as_str().to_string(),
            details: event.details,
            recorded_at: event.recorded_at,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Generic acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    /// The acknowledgement returned by plain mutations.
    #[must_use]
    pub fn success() -> Self {
        Self {
            message: String::from("success"),
        }
    }
}

/// Successful login.
///
/// `message` carries the logged-in phone number. The session token is
/// handed to the transport layer separately and never serialized.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub role: String,
    #[serde(skip)]
    pub session_token: String,
}

/// Successful account registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAccountResponse {
    /// The registered phone number.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resident: Option<ResidentRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_member: Option<StaffMemberRecord>,
}

/// One page of registered phone numbers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListUsersResponse {
    pub phones: Vec<String>,
    pub meta: PageMeta,
}

/// Profiles attached to a phone number.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserDetailsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resident: Option<ResidentRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<StaffMemberRecord>,
}

/// The houses of one resident.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResidentHousesResponse {
    pub houses: Vec<HouseRecord>,
}

/// A resident's phone number.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResidentPhoneResponse {
    pub phone: String,
}

/// One page of houses.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListHousesResponse {
    pub houses: Vec<HouseRecord>,
    pub meta: PageMeta,
}

/// The active specializations of one staff member.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaffSpecializationsResponse {
    pub specializations: Vec<SpecializationRecord>,
}

/// One page of specializations.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListSpecializationsResponse {
    pub specializations: Vec<SpecializationRecord>,
    pub meta: PageMeta,
}

/// One page of organizations.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListOrganizationsResponse {
    pub organizations: Vec<OrganizationRecord>,
    pub meta: PageMeta,
}

/// One page of maintenance requests.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ListRequestsResponse {
    pub requests: Vec<RequestRecord>,
    pub meta: PageMeta,
}

/// Result of a request update.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestResponse {
    pub message: String,
    #[serde(rename = "responsibleID")]
    pub responsible_id: Option<i64>,
    pub status: String,
}

/// The least busy staff member for a specialization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeastBusyResponse {
    /// The staff member's ID.
    pub least_busy: i64,
    pub full_name: String,
}

/// Audit trail of one request, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHistoryResponse {
    #[serde(rename = "requestID")]
    pub request_id: String,
    pub events: Vec<AuditEventRecord>,
}
