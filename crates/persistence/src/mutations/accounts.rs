// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Units of work spanning the identity, resident and staff tables.

use diesel::SqliteConnection;
use diesel::prelude::*;
use hoa_tickets_domain::{Resident, StaffMember, User};
use tracing::info;

use crate::data_models::RegisteredAccount;
use crate::error::PersistenceError;
use crate::mutations::credentials::{delete_credential, insert_credential};
use crate::mutations::residents::{delete_resident_by_phone, register_resident};
use crate::mutations::sessions::delete_sessions_for_phone;
use crate::mutations::staff::{delete_staff_member_by_phone, register_staff_member};

/// Registers a credential plus a resident and/or staff profile.
///
/// Everything runs in one transaction: if any step fails nothing is kept,
/// so a credential without a role cannot be produced here.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `phone_number` - The login
/// * `password_hash` - The already computed bcrypt hash
/// * `full_name` - Name for the resident and staff profiles
/// * `as_resident` - Create a resident profile
/// * `as_staff` - Create a staff member profile
///
/// # Errors
///
/// Returns `Other` if neither role was requested, or the first failing
/// step's error.
pub fn register_account(
    conn: &mut SqliteConnection,
    phone_number: &str,
    password_hash: &str,
    full_name: &str,
    as_resident: bool,
    as_staff: bool,
) -> Result<RegisteredAccount, PersistenceError> {
    if !as_resident && !as_staff {
        return Err(PersistenceError::Other(String::from(
            "An account needs at least one role",
        )));
    }

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let user: User = insert_credential(conn, phone_number, password_hash)?;

        let resident: Option<Resident> = if as_resident {
            Some(register_resident(conn, phone_number, full_name)?)
        } else {
            None
        };

        let staff_member: Option<StaffMember> = if as_staff {
            Some(register_staff_member(conn, phone_number, full_name)?)
        } else {
            None
        };

        info!(phone_number, as_resident, as_staff, "Registered account");
        Ok(RegisteredAccount {
            user,
            resident,
            staff_member,
        })
    })
}

/// Removes a user and every profile and session tied to the phone number.
///
/// A missing resident or staff profile is not an error.
///
/// # Errors
///
/// Returns `CredentialNotFound` if no credential exists for the phone
/// number; nothing is removed in that case.
pub fn delete_user(
    conn: &mut SqliteConnection,
    phone_number: &str,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        match delete_resident_by_phone(conn, phone_number) {
            Ok(()) | Err(PersistenceError::ResidentNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        match delete_staff_member_by_phone(conn, phone_number) {
            Ok(()) | Err(PersistenceError::StaffMemberNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        delete_credential(conn, phone_number)?;
        let sessions: usize = delete_sessions_for_phone(conn, phone_number)?;

        info!(phone_number, sessions, "Deleted user");
        Ok(())
    })
}
