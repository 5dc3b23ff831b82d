// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request audit event persistence.

use diesel::SqliteConnection;
use diesel::prelude::*;
use hoa_tickets_audit::AuditEvent;
use hoa_tickets_domain::RequestStatus;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::request_audit_events;
use crate::error::PersistenceError;
use crate::timestamps::now_timestamp;

/// Persists an audit event and returns its assigned ID.
///
/// Callers run this inside the transaction that made the change.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let recorded_at: String = now_timestamp()?;

    diesel::insert_into(request_audit_events::table)
        .values((
            request_audit_events::request_id.eq(&event.request_id),
            request_audit_events::actor_phone_number.eq(&event.actor.id),
            request_audit_events::actor_role.eq(&event.actor.actor_type),
            request_audit_events::action.eq(event.action.as_str()),
            request_audit_events::before_status
                .eq(event.change.before.as_ref().map(RequestStatus::as_str)),
            request_audit_events::after_status.eq(event.change.after.as_str()),
            request_audit_events::details.eq(event.details.as_deref()),
            request_audit_events::created_at.eq(&recorded_at),
        ))
        .execute(conn)?;

    let event_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        event_id,
        request_id = %event.request_id,
        action = event.action.as_str(),
        "Recorded request audit event"
    );

    Ok(event_id)
}
