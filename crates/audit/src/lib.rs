// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit trail for the request lifecycle.
//!
//! Every request creation and update produces exactly one audit event
//! recording who acted, what they did, and the status before and after.
//! Status changes are unrestricted, so the trail is the record of how a
//! request moved through its lifecycle.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use hoa_tickets_domain::RequestStatus;
use serde::{Deserialize, Serialize};

/// Represents the user performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The acting user's phone number.
    pub id: String,
    /// The role the user acted in (e.g., "resident", "staff").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The acting user's phone number
    /// * `actor_type` - The role the user acted in
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// The kind of change made to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// A resident filed the request.
    CreateRequest,
    /// Staff rewrote the request.
    UpdateRequest,
}

impl Action {
    /// Returns the stored name of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateRequest => "CreateRequest",
            Self::UpdateRequest => "UpdateRequest",
        }
    }

    /// Parses a stored action name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "CreateRequest" => Some(Self::CreateRequest),
            "UpdateRequest" => Some(Self::UpdateRequest),
            _ => None,
        }
    }
}

/// Status of a request before and after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Status before the change; `None` when the request was just created.
    pub before: Option<RequestStatus>,
    /// Status after the change.
    pub after: RequestStatus,
}

impl StatusChange {
    /// Creates a new `StatusChange`.
    #[must_use]
    pub const fn new(before: Option<RequestStatus>, after: RequestStatus) -> Self {
        Self { before, after }
    }

    /// Returns true if the status actually changed.
    #[must_use]
    pub fn is_transition(&self) -> bool {
        self.before != Some(self.after)
    }
}

/// An immutable audit event for one request change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Storage-assigned identifier; `None` until persisted.
    pub event_id: Option<i64>,
    /// The request that changed.
    pub request_id: String,
    /// Who made the change.
    pub actor: Actor,
    /// What kind of change was made.
    pub action: Action,
    /// The status movement caused by the change.
    pub change: StatusChange,
    /// Free-text details (e.g., new responsible staff member).
    pub details: Option<String>,
    /// Server time the event was recorded; `None` until persisted.
    pub recorded_at: Option<String>,
}

impl AuditEvent {
    /// Creates a new, not yet persisted `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `request_id` - The request that changed
    /// * `actor` - Who made the change
    /// * `action` - What kind of change was made
    /// * `change` - The status before and after
    /// * `details` - Optional free-text details
    #[must_use]
    pub const fn new(
        request_id: String,
        actor: Actor,
        action: Action,
        change: StatusChange,
        details: Option<String>,
    ) -> Self {
        Self {
            event_id: None,
            request_id,
            actor,
            action,
            change,
            details,
            recorded_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_creation_requires_all_fields() {
        let actor: Actor = Actor::new(String::from("7001234567"), String::from("staff"));

        assert_eq!(actor.id, "7001234567");
        assert_eq!(actor.actor_type, "staff");
    }

    #[test]
    fn test_action_names_round_trip() {
        for action in [Action::CreateRequest, Action::UpdateRequest] {
            assert_eq!(Action::from_name(action.as_str()), Some(action));
        }
        assert_eq!(Action::from_name("DeleteRequest"), None);
    }

    #[test]
    fn test_status_change_detects_transitions() {
        let created: StatusChange = StatusChange::new(None, RequestStatus::Created);
        let unchanged: StatusChange =
            StatusChange::new(Some(RequestStatus::Assigned), RequestStatus::Assigned);
        let moved: StatusChange =
            StatusChange::new(Some(RequestStatus::Assigned), RequestStatus::Completed);

        assert!(created.is_transition());
        assert!(!unchanged.is_transition());
        assert!(moved.is_transition());
    }

    #[test]
    fn test_new_audit_event_is_unpersisted() {
        let event: AuditEvent = AuditEvent::new(
            String::from("req-1"),
            Actor::new(String::from("7001234567"), String::from("resident")),
            Action::CreateRequest,
            StatusChange::new(None, RequestStatus::Created),
            None,
        );

        assert_eq!(event.event_id, None);
        assert_eq!(event.recorded_at, None);
        assert_eq!(event.request_id, "req-1");
        assert_eq!(event.action, Action::CreateRequest);
    }
}
