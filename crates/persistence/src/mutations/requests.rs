// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maintenance request mutations.
//!
//! Creation and update write their audit event in the same transaction as
//! the request row, so the trail never misses or invents a change.

use diesel::SqliteConnection;
use diesel::prelude::*;
use hoa_tickets_audit::{Action, Actor, AuditEvent, StatusChange};
use hoa_tickets_domain::{NewRequest, Request, RequestStatus};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::backend::sqlite::is_foreign_key_violation;
use crate::diesel_schema::requests;
use crate::error::PersistenceError;
use crate::ids::{ID_GENERATION_ATTEMPTS, generate_opaque_id};
use crate::mutations::audit::insert_audit_event;
use crate::timestamps::{format_timestamp, parse_timestamp};

/// Describes who a request is handed to, for the audit trail.
fn describe_assignment(request: &Request) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(responsible_id) = request.responsible_id {
        parts.push(format!("responsible staff member {responsible_id}"));
    }
    if let Some(organization_id) = &request.organization_id {
        parts.push(format!("organization {organization_id}"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Files a new request with status "created".
///
/// The caller must already have checked that the resident is associated
/// with the house. Cost, responsible staff member and organization start
/// unset, and the creation time is the current server time.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `new_request` - The resident, house, type and complaint
/// * `actor` - Who filed the request, for the audit trail
///
/// # Errors
///
/// Returns `NotFound` if the resident or house does not exist, or
/// `CreatingRequestFailed` if every ID generation attempt failed.
pub fn create_request(
    conn: &mut SqliteConnection,
    new_request: &NewRequest,
    actor: &Actor,
) -> Result<Request, PersistenceError> {
    let created_text: String = format_timestamp(OffsetDateTime::now_utc())?;
    let created_at: OffsetDateTime = parse_timestamp(&created_text)?;
    let status: RequestStatus = RequestStatus::Created;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        for attempt in 1..=ID_GENERATION_ATTEMPTS {
            let request_id: String = generate_opaque_id();

            let result: Result<usize, diesel::result::Error> =
                diesel::insert_into(requests::table)
                    .values((
                        requests::request_id.eq(&request_id),
                        requests::resident_id.eq(&new_request.resident_id),
                        requests::house_id.eq(new_request.house_id),
                        requests::request_type.eq(new_request.request_type.as_str()),
                        requests::complaint.eq(&new_request.complaint),
                        requests::status.eq(status.as_str()),
                        requests::created_at.eq(&created_text),
                    ))
                    .on_conflict_do_nothing()
                    .execute(conn);

            match result {
                Ok(1) => {
                    let event: AuditEvent = AuditEvent::new(
                        request_id.clone(),
                        actor.clone(),
                        Action::CreateRequest,
                        StatusChange::new(None, status),
                        None,
                    );
                    insert_audit_event(conn, &event)?;

                    info!(
                        request_id = %request_id,
                        resident_id = %new_request.resident_id,
                        house_id = new_request.house_id,
                        "Created request"
                    );

                    return Ok(Request {
                        id: request_id,
                        resident_id: new_request.resident_id.clone(),
                        house_id: new_request.house_id,
                        request_type: new_request.request_type,
                        complaint: new_request.complaint.clone(),
                        cost: None,
                        status,
                        responsible_id: None,
                        organization_id: None,
                        created_at,
                    });
                }
                Ok(_) => warn!(attempt, "Request ID collision, regenerating"),
                Err(e) if is_foreign_key_violation(&e) => {
                    return Err(PersistenceError::NotFound(format!(
                        "resident {} or house {}",
                        new_request.resident_id, new_request.house_id
                    )));
                }
                Err(e) => warn!(attempt, error = %e, "Request insert failed, regenerating ID"),
            }
        }

        Err(PersistenceError::CreatingRequestFailed(format!(
            "after {ID_GENERATION_ATTEMPTS} attempts"
        )))
    })
}

/// Rewrites every mutable field of a request.
///
/// The creation time is immutable and is not touched. The status change
/// is recorded in the audit trail.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `request` - The complete new state of the request
/// * `actor` - Who made the change, for the audit trail
///
/// # Errors
///
/// Returns `RequestNotFound` if the request does not exist.
pub fn update_request(
    conn: &mut SqliteConnection,
    request: &Request,
    actor: &Actor,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let before_text: String = requests::table
            .filter(requests::request_id.eq(&request.id))
            .select(requests::status)
            .first::<String>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    PersistenceError::RequestNotFound(format!("ID {}", request.id))
                }
                other => PersistenceError::from(other),
            })?;
        let before: RequestStatus = before_text.parse()?;

        diesel::update(requests::table.filter(requests::request_id.eq(&request.id)))
            .set((
                requests::resident_id.eq(&request.resident_id),
                requests::house_id.eq(request.house_id),
                requests::request_type.eq(request.request_type.as_str()),
                requests::complaint.eq(&request.complaint),
                requests::cost.eq(request.cost),
                requests::status.eq(request.status.as_str()),
                requests::responsible_id.eq(request.responsible_id),
                requests::organization_id.eq(request.organization_id.as_deref()),
            ))
            .execute(conn)?;

        let event: AuditEvent = AuditEvent::new(
            request.id.clone(),
            actor.clone(),
            Action::UpdateRequest,
            StatusChange::new(Some(before), request.status),
            describe_assignment(request),
        );
        insert_audit_event(conn, &event)?;

        info!(
            request_id = %request.id,
            from = %before,
            to = %request.status,
            "Updated request"
        );
        Ok(())
    })
}

/// Deletes a request by ID. Its audit events go with it.
///
/// # Errors
///
/// Returns `RequestNotFound` if no request has the ID.
pub fn delete_request(
    conn: &mut SqliteConnection,
    request_id: &str,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(requests::table.filter(requests::request_id.eq(request_id)))
        .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::RequestNotFound(format!("ID {request_id}")));
    }

    info!(request_id, "Deleted request");
    Ok(())
}
