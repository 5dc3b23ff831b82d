// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::sessions;
use crate::error::PersistenceError;
use crate::timestamps::now_timestamp;

/// Creates a session and returns its ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The opaque token handed to the client
/// * `phone_number` - The authenticated phone number
/// * `role` - The role chosen at login
/// * `expires_at` - Expiry in stored timestamp form
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    phone_number: &str,
    role: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    let created_at: String = now_timestamp()?;

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::phone_number.eq(phone_number),
            sessions::role.eq(role),
            sessions::created_at.eq(&created_at),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = get_last_insert_rowid(conn)?;
    debug!(session_id, phone_number, role, "Created session");
    Ok(session_id)
}

/// Deletes a session by token.
///
/// # Errors
///
/// Returns `SessionNotFound` if no session has the token.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(sessions::table.filter(sessions::session_token.eq(session_token)))
            .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::SessionNotFound(String::from(
            "no session for token",
        )));
    }

    Ok(())
}

/// Deletes every session of a phone number and returns how many went.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_sessions_for_phone(
    conn: &mut SqliteConnection,
    phone_number: &str,
) -> Result<usize, PersistenceError> {
    Ok(
        diesel::delete(sessions::table.filter(sessions::phone_number.eq(phone_number)))
            .execute(conn)?,
    )
}

/// Deletes every session that expired at or before `now`.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: &str,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(sessions::table.filter(sessions::expires_at.le(now)))
        .execute(conn)?;

    if deleted > 0 {
        debug!(deleted, "Purged expired sessions");
    }
    Ok(deleted)
}
