// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resident and house queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use hoa_tickets_domain::{House, Resident};
use tracing::debug;

use crate::diesel_schema::{houses, residents, residents_houses};
use crate::error::PersistenceError;
use crate::queries::{LIKE_ESCAPE, like_pattern};

/// Diesel Queryable struct for resident rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = residents)]
pub(crate) struct ResidentRow {
    resident_id: String,
    phone_number: String,
    full_name: String,
}

impl ResidentRow {
    pub(crate) fn into_resident(self) -> Resident {
        Resident {
            id: self.resident_id,
            phone_number: self.phone_number,
            full_name: self.full_name,
        }
    }
}

/// Diesel Queryable struct for house rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = houses)]
struct HouseRow {
    house_id: i64,
    address: String,
}

impl HouseRow {
    fn into_house(self) -> House {
        House {
            id: self.house_id,
            address: self.address,
        }
    }
}

/// Retrieves a resident by phone number.
///
/// # Errors
///
/// Returns `ResidentNotFound` if no resident has the phone number.
pub fn get_resident_by_phone(
    conn: &mut SqliteConnection,
    phone_number: &str,
) -> Result<Resident, PersistenceError> {
    debug!(phone_number, "Looking up resident by phone number");

    residents::table
        .filter(residents::phone_number.eq(phone_number))
        .select(ResidentRow::as_select())
        .first::<ResidentRow>(conn)
        .map(ResidentRow::into_resident)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                PersistenceError::ResidentNotFound(format!("phone number {phone_number}"))
            }
            other => PersistenceError::from(other),
        })
}

/// Retrieves a resident by ID.
///
/// # Errors
///
/// Returns `ResidentNotFound` if the resident does not exist.
pub fn get_resident_by_id(
    conn: &mut SqliteConnection,
    resident_id: &str,
) -> Result<Resident, PersistenceError> {
    residents::table
        .filter(residents::resident_id.eq(resident_id))
        .select(ResidentRow::as_select())
        .first::<ResidentRow>(conn)
        .map(ResidentRow::into_resident)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                PersistenceError::ResidentNotFound(format!("ID {resident_id}"))
            }
            other => PersistenceError::from(other),
        })
}

/// Retrieves a house by ID.
///
/// # Errors
///
/// Returns `HouseNotFound` if the house does not exist.
pub fn get_house_by_id(
    conn: &mut SqliteConnection,
    house_id: i64,
) -> Result<House, PersistenceError> {
    houses::table
        .filter(houses::house_id.eq(house_id))
        .select(HouseRow::as_select())
        .first::<HouseRow>(conn)
        .map(HouseRow::into_house)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => PersistenceError::HouseNotFound(house_id),
            other => PersistenceError::from(other),
        })
}

/// Returns true only if the resident is associated with the house.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn validate_resident_house(
    conn: &mut SqliteConnection,
    resident_id: &str,
    house_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = residents_houses::table
        .filter(residents_houses::resident_id.eq(resident_id))
        .filter(residents_houses::house_id.eq(house_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Lists houses whose address contains `pattern`, ordered by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `pattern` - Substring to match; empty matches everything
/// * `limit` - Page size
/// * `offset` - Rows to skip
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_houses(
    conn: &mut SqliteConnection,
    pattern: &str,
    limit: i64,
    offset: i64,
) -> Result<(Vec<House>, i64), PersistenceError> {
    let pattern: String = like_pattern(pattern);

    let total: i64 = houses::table
        .filter(houses::address.like(&pattern).escape(LIKE_ESCAPE))
        .count()
        .get_result(conn)?;

    let rows: Vec<HouseRow> = houses::table
        .filter(houses::address.like(&pattern).escape(LIKE_ESCAPE))
        .select(HouseRow::as_select())
        .order(houses::house_id.asc())
        .limit(limit)
        .offset(offset)
        .load(conn)?;

    Ok((rows.into_iter().map(HouseRow::into_house).collect(), total))
}

/// Lists every house the resident is associated with, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_resident_houses(
    conn: &mut SqliteConnection,
    resident_id: &str,
) -> Result<Vec<House>, PersistenceError> {
    let rows: Vec<HouseRow> = houses::table
        .inner_join(residents_houses::table)
        .filter(residents_houses::resident_id.eq(resident_id))
        .select(HouseRow::as_select())
        .order(houses::house_id.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(HouseRow::into_house).collect())
}
