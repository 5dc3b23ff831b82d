// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request history queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use hoa_tickets_audit::{Action, Actor, AuditEvent, StatusChange};
use hoa_tickets_domain::RequestStatus;

use crate::diesel_schema::request_audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = request_audit_events)]
struct AuditEventRow {
    event_id: i64,
    request_id: String,
    actor_phone_number: String,
    actor_role: String,
    action: String,
    before_status: Option<String>,
    after_status: String,
    details: Option<String>,
    created_at: String,
}

impl AuditEventRow {
    fn into_event(self) -> Result<AuditEvent, PersistenceError> {
        let action: Action = Action::from_name(&self.action).ok_or_else(|| {
            PersistenceError::CorruptRow(format!("Unknown action '{}'", self.action))
        })?;
        let before: Option<RequestStatus> = self
            .before_status
            .as_deref()
            .map(str::parse::<RequestStatus>)
            .transpose()?;
        let after: RequestStatus = self.after_status.parse()?;

        Ok(AuditEvent {
            event_id: Some(self.event_id),
            request_id: self.request_id,
            actor: Actor::new(self.actor_phone_number, self.actor_role),
            action,
            change: StatusChange::new(before, after),
            details: self.details,
            recorded_at: Some(self.created_at),
        })
    }
}

/// Retrieves the audit trail of a request, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn get_request_history(
    conn: &mut SqliteConnection,
    request_id: &str,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = request_audit_events::table
        .filter(request_audit_events::request_id.eq(request_id))
        .select(AuditEventRow::as_select())
        .order(request_audit_events::event_id.asc())
        .load(conn)?;

    rows.into_iter().map(AuditEventRow::into_event).collect()
}
