// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login credential mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use hoa_tickets_domain::User;
use tracing::info;

use crate::diesel_schema::login_credentials;
use crate::error::PersistenceError;
use crate::timestamps::now_timestamp;

/// Inserts a new login credential.
///
/// The insert is conditional: an existing phone number is reported as a
/// conflict rather than overwritten.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `phone_number` - The login
/// * `password_hash` - The bcrypt hash of the password
///
/// # Errors
///
/// Returns `AlreadyExists` if the phone number is already registered.
pub fn insert_credential(
    conn: &mut SqliteConnection,
    phone_number: &str,
    password_hash: &str,
) -> Result<User, PersistenceError> {
    let created_at: String = now_timestamp()?;

    let inserted: usize = diesel::insert_into(login_credentials::table)
        .values((
            login_credentials::phone_number.eq(phone_number),
            login_credentials::password_hash.eq(password_hash),
            login_credentials::created_at.eq(&created_at),
        ))
        .on_conflict_do_nothing()
        .execute(conn)?;

    if inserted == 0 {
        return Err(PersistenceError::AlreadyExists(format!(
            "user with phone number {phone_number}"
        )));
    }

    info!(phone_number, "Registered login credential");
    Ok(User::new(phone_number.to_string()))
}

/// Deletes the login credential for a phone number.
///
/// # Errors
///
/// Returns `CredentialNotFound` if no credential exists.
pub fn delete_credential(
    conn: &mut SqliteConnection,
    phone_number: &str,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(
        login_credentials::table.filter(login_credentials::phone_number.eq(phone_number)),
    )
    .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::CredentialNotFound(
            phone_number.to_string(),
        ));
    }

    info!(phone_number, "Deleted login credential");
    Ok(())
}
