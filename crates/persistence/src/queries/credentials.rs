// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login credential queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use hoa_tickets_domain::User;
use tracing::debug;

use crate::diesel_schema::login_credentials;
use crate::error::PersistenceError;
use crate::queries::{LIKE_ESCAPE, like_pattern};

/// Loads the stored password hash for a phone number.
///
/// # Errors
///
/// Returns `CredentialNotFound` if no credential exists for the phone
/// number, or a database error.
pub fn find_password_hash(
    conn: &mut SqliteConnection,
    phone_number: &str,
) -> Result<String, PersistenceError> {
    debug!(phone_number, "Loading password hash");

    login_credentials::table
        .filter(login_credentials::phone_number.eq(phone_number))
        .select(login_credentials::password_hash)
        .first::<String>(conn)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                PersistenceError::CredentialNotFound(phone_number.to_string())
            }
            other => PersistenceError::from(other),
        })
}

/// Returns true if a credential exists for the phone number.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn credential_exists(
    conn: &mut SqliteConnection,
    phone_number: &str,
) -> Result<bool, PersistenceError> {
    let count: i64 = login_credentials::table
        .filter(login_credentials::phone_number.eq(phone_number))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Lists registered users whose phone number contains `phone_filter`.
///
/// Results are ordered by phone number.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `phone_filter` - Substring to match; empty matches everything
/// * `limit` - Page size
/// * `offset` - Rows to skip
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(
    conn: &mut SqliteConnection,
    phone_filter: &str,
    limit: i64,
    offset: i64,
) -> Result<(Vec<User>, i64), PersistenceError> {
    let pattern: String = like_pattern(phone_filter);

    let total: i64 = login_credentials::table
        .filter(login_credentials::phone_number.like(&pattern).escape(LIKE_ESCAPE))
        .count()
        .get_result(conn)?;

    let phone_numbers: Vec<String> = login_credentials::table
        .filter(login_credentials::phone_number.like(&pattern).escape(LIKE_ESCAPE))
        .select(login_credentials::phone_number)
        .order(login_credentials::phone_number.asc())
        .limit(limit)
        .offset(offset)
        .load(conn)?;

    Ok((phone_numbers.into_iter().map(User::new).collect(), total))
}
