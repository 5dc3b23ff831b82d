// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resident and house mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use hoa_tickets_domain::{House, Resident};
use tracing::{info, warn};

use crate::backend::sqlite::{get_last_insert_rowid, is_unique_violation};
use crate::diesel_schema::{houses, residents, residents_houses};
use crate::error::PersistenceError;
use crate::ids::{ID_GENERATION_ATTEMPTS, generate_opaque_id};
use crate::queries::residents::{get_house_by_id, get_resident_by_id};

/// Registers a new resident under a freshly generated ID.
///
/// The ID is regenerated up to `ID_GENERATION_ATTEMPTS` times when the
/// insert collides with an existing ID or fails.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `phone_number` - The resident's phone number
/// * `full_name` - The resident's full name
///
/// # Errors
///
/// Returns `AlreadyExists` if the phone number already has a resident, or
/// `RegistrationFailed` if every attempt failed.
pub fn register_resident(
    conn: &mut SqliteConnection,
    phone_number: &str,
    full_name: &str,
) -> Result<Resident, PersistenceError> {
    for attempt in 1..=ID_GENERATION_ATTEMPTS {
        let resident_id: String = generate_opaque_id();

        let result: Result<usize, diesel::result::Error> =
            diesel::insert_into(residents::table)
                .values((
                    residents::resident_id.eq(&resident_id),
                    residents::phone_number.eq(phone_number),
                    residents::full_name.eq(full_name),
                ))
                .on_conflict_do_nothing()
                .execute(conn);

        match result {
            Ok(1) => {
                info!(resident_id = %resident_id, phone_number, "Registered resident");
                return Ok(Resident {
                    id: resident_id,
                    phone_number: phone_number.to_string(),
                    full_name: full_name.to_string(),
                });
            }
            Ok(_) => {
                let phone_taken: i64 = residents::table
                    .filter(residents::phone_number.eq(phone_number))
                    .count()
                    .get_result(conn)?;
                if phone_taken > 0 {
                    return Err(PersistenceError::AlreadyExists(format!(
                        "resident with phone number {phone_number}"
                    )));
                }
                warn!(attempt, "Resident ID collision, regenerating");
            }
            Err(e) => warn!(attempt, error = %e, "Resident insert failed, regenerating ID"),
        }
    }

    Err(PersistenceError::RegistrationFailed(format!(
        "resident with phone number {phone_number} after {ID_GENERATION_ATTEMPTS} attempts"
    )))
}

/// Registers a new house.
///
/// # Errors
///
/// Returns `AlreadyExists` if a house with the same address exists.
pub fn register_house(
    conn: &mut SqliteConnection,
    address: &str,
) -> Result<House, PersistenceError> {
    diesel::insert_into(houses::table)
        .values(houses::address.eq(address))
        .execute(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                PersistenceError::AlreadyExists(format!("house at '{address}'"))
            } else {
                PersistenceError::from(e)
            }
        })?;

    let house_id: i64 = get_last_insert_rowid(conn)?;
    info!(house_id, "Registered house");

    Ok(House {
        id: house_id,
        address: address.to_string(),
    })
}

/// Associates a resident with a house.
///
/// Adding an existing association is a no-op.
///
/// # Errors
///
/// Returns `ResidentNotFound` or `HouseNotFound` if either side does not
/// exist.
pub fn add_resident_house(
    conn: &mut SqliteConnection,
    resident_id: &str,
    house_id: i64,
) -> Result<(), PersistenceError> {
    get_resident_by_id(conn, resident_id)?;
    get_house_by_id(conn, house_id)?;

    diesel::insert_into(residents_houses::table)
        .values((
            residents_houses::resident_id.eq(resident_id),
            residents_houses::house_id.eq(house_id),
        ))
        .on_conflict_do_nothing()
        .execute(conn)?;

    Ok(())
}

/// Removes the association between a resident and a house.
///
/// # Errors
///
/// Returns `AssociationNotFound` if the pair was not associated.
pub fn delete_resident_house(
    conn: &mut SqliteConnection,
    resident_id: &str,
    house_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(
        residents_houses::table
            .filter(residents_houses::resident_id.eq(resident_id))
            .filter(residents_houses::house_id.eq(house_id)),
    )
    .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::AssociationNotFound {
            resident_id: resident_id.to_string(),
            house_id,
        });
    }

    Ok(())
}

/// Deletes the resident with the given phone number.
///
/// House associations and requests are removed by cascade.
///
/// # Errors
///
/// Returns `ResidentNotFound` if no resident has the phone number. Callers
/// cascading a user removal treat this as success.
pub fn delete_resident_by_phone(
    conn: &mut SqliteConnection,
    phone_number: &str,
) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(residents::table.filter(residents::phone_number.eq(phone_number)))
            .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::ResidentNotFound(format!(
            "phone number {phone_number}"
        )));
    }

    info!(phone_number, "Deleted resident");
    Ok(())
}

/// Changes a house's address.
///
/// # Errors
///
/// Returns `HouseNotFound` if the house does not exist, or `AlreadyExists`
/// if another house has the new address.
pub fn update_house_address(
    conn: &mut SqliteConnection,
    house_id: i64,
    address: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(houses::table.filter(houses::house_id.eq(house_id)))
        .set(houses::address.eq(address))
        .execute(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                PersistenceError::AlreadyExists(format!("house at '{address}'"))
            } else {
                PersistenceError::from(e)
            }
        })?;

    if updated == 0 {
        return Err(PersistenceError::HouseNotFound(house_id));
    }

    Ok(())
}
