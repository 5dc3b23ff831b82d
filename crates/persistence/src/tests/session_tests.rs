// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session persistence tests.

use crate::{Persistence, PersistenceError, SessionData};

use super::create_test_persistence;

#[test]
fn test_create_and_lookup_session() {
    let mut persistence: Persistence = create_test_persistence();

    let session_id: i64 = persistence
        .create_session("token-abc", "7001234567", "resident", "2099-01-01T00:00:00.000000Z")
        .unwrap();

    let session: SessionData = persistence
        .get_session_by_token("token-abc")
        .unwrap()
        .unwrap();
    assert_eq!(session.session_id, session_id);
    assert_eq!(session.phone_number, "7001234567");
    assert_eq!(session.role, "resident");
    assert_eq!(session.expires_at, "2099-01-01T00:00:00.000000Z");
}

#[test]
fn test_unknown_token_returns_none() {
    let mut persistence: Persistence = create_test_persistence();
    assert_eq!(persistence.get_session_by_token("missing").unwrap(), None);
}

#[test]
fn test_delete_session() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .create_session("token-abc", "7001234567", "staff", "2099-01-01T00:00:00.000000Z")
        .unwrap();

    persistence.delete_session("token-abc").unwrap();

    assert_eq!(persistence.get_session_by_token("token-abc").unwrap(), None);
    assert!(matches!(
        persistence.delete_session("token-abc"),
        Err(PersistenceError::SessionNotFound(_))
    ));
}

#[test]
fn test_delete_expired_sessions_keeps_live_ones() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .create_session("old", "7001234567", "staff", "2020-01-01T00:00:00.000000Z")
        .unwrap();
    persistence
        .create_session("live", "7001234567", "staff", "2099-01-01T00:00:00.000000Z")
        .unwrap();

    let purged: usize = persistence
        .delete_expired_sessions("2026-06-01T00:00:00.000000Z")
        .unwrap();

    assert_eq!(purged, 1);
    assert_eq!(persistence.get_session_by_token("old").unwrap(), None);
    assert!(persistence.get_session_by_token("live").unwrap().is_some());
}
