// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff member, specialization and organization mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use hoa_tickets_domain::{Organization, Specialization, StaffMember, StaffMemberStatus};
use tracing::{info, warn};

use crate::backend::sqlite::{get_last_insert_rowid, is_unique_violation};
use crate::diesel_schema::{
    organizations, specializations, staff_member_specializations, staff_members,
};
use crate::error::PersistenceError;
use crate::ids::{ID_GENERATION_ATTEMPTS, generate_opaque_id};
use crate::queries::staff::{
    get_specialization_by_id, get_staff_member_by_id, get_staff_member_by_phone,
};

/// Registers a new staff member with status "active".
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `phone_number` - The staff member's phone number
/// * `full_name` - The staff member's full name
///
/// # Errors
///
/// Returns `CreatingMemberFailed` if the phone number already has a staff
/// member.
pub fn register_staff_member(
    conn: &mut SqliteConnection,
    phone_number: &str,
    full_name: &str,
) -> Result<StaffMember, PersistenceError> {
    let status: StaffMemberStatus = StaffMemberStatus::Active;

    diesel::insert_into(staff_members::table)
        .values((
            staff_members::phone_number.eq(phone_number),
            staff_members::full_name.eq(full_name),
            staff_members::status.eq(status.as_str()),
        ))
        .execute(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                PersistenceError::CreatingMemberFailed(format!(
                    "staff member with phone number {phone_number} already exists"
                ))
            } else {
                PersistenceError::from(e)
            }
        })?;

    let staff_member_id: i64 = get_last_insert_rowid(conn)?;
    info!(staff_member_id, phone_number, "Registered staff member");

    Ok(StaffMember {
        id: staff_member_id,
        phone_number: phone_number.to_string(),
        full_name: full_name.to_string(),
        status,
    })
}

/// Registers a new specialization under a freshly generated ID.
///
/// # Errors
///
/// Returns `AlreadyExists` if the title is taken, or `RegistrationFailed`
/// if every ID generation attempt failed.
pub fn register_specialization(
    conn: &mut SqliteConnection,
    title: &str,
) -> Result<Specialization, PersistenceError> {
    for attempt in 1..=ID_GENERATION_ATTEMPTS {
        let specialization_id: String = generate_opaque_id();

        let result: Result<usize, diesel::result::Error> =
            diesel::insert_into(specializations::table)
                .values((
                    specializations::specialization_id.eq(&specialization_id),
                    specializations::title.eq(title),
                ))
                .on_conflict_do_nothing()
                .execute(conn);

        match result {
            Ok(1) => {
                info!(specialization_id = %specialization_id, title, "Registered specialization");
                return Ok(Specialization {
                    id: specialization_id,
                    title: title.to_string(),
                });
            }
            Ok(_) => {
                let title_taken: i64 = specializations::table
                    .filter(specializations::title.eq(title))
                    .count()
                    .get_result(conn)?;
                if title_taken > 0 {
                    return Err(PersistenceError::AlreadyExists(format!(
                        "specialization '{title}'"
                    )));
                }
                warn!(attempt, "Specialization ID collision, regenerating");
            }
            Err(e) => warn!(attempt, error = %e, "Specialization insert failed, regenerating ID"),
        }
    }

    Err(PersistenceError::RegistrationFailed(format!(
        "specialization '{title}' after {ID_GENERATION_ATTEMPTS} attempts"
    )))
}

/// Gives a staff member a specialization.
///
/// If the association exists (active or not) it is reactivated, otherwise
/// a new active association is inserted.
///
/// # Errors
///
/// Returns `StaffMemberNotFound` or `SpecializationNotFound` if either
/// side does not exist.
pub fn add_staff_member_specialization(
    conn: &mut SqliteConnection,
    staff_member_id: i64,
    specialization_id: &str,
) -> Result<(), PersistenceError> {
    get_staff_member_by_id(conn, staff_member_id)?;
    get_specialization_by_id(conn, specialization_id)?;

    diesel::insert_into(staff_member_specializations::table)
        .values((
            staff_member_specializations::staff_member_id.eq(staff_member_id),
            staff_member_specializations::specialization_id.eq(specialization_id),
            staff_member_specializations::is_active.eq(true),
        ))
        .on_conflict((
            staff_member_specializations::staff_member_id,
            staff_member_specializations::specialization_id,
        ))
        .do_update()
        .set(staff_member_specializations::is_active.eq(true))
        .execute(conn)?;

    info!(staff_member_id, specialization_id, "Activated specialization");
    Ok(())
}

/// Deactivates a staff member's specialization.
///
/// The association row is kept with `is_active = false`.
///
/// # Errors
///
/// Returns `StaffMemberNotFound` if no active association matched, which
/// covers both "never assigned" and "already inactive".
pub fn deactivate_staff_member_specialization(
    conn: &mut SqliteConnection,
    staff_member_id: i64,
    specialization_id: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        staff_member_specializations::table
            .filter(staff_member_specializations::staff_member_id.eq(staff_member_id))
            .filter(staff_member_specializations::specialization_id.eq(specialization_id))
            .filter(staff_member_specializations::is_active.eq(true)),
    )
    .set(staff_member_specializations::is_active.eq(false))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::StaffMemberNotFound(format!(
            "no active specialization {specialization_id} for staff member {staff_member_id}"
        )));
    }

    info!(staff_member_id, specialization_id, "Deactivated specialization");
    Ok(())
}

/// Deletes a staff member and all of their specialization associations.
///
/// Both deletes run in one transaction. Requests the member was
/// responsible for are left unassigned by cascade.
///
/// # Errors
///
/// Returns `StaffMemberNotFound` if the member does not exist or vanished
/// before the final delete.
pub fn delete_staff_member_by_phone(
    conn: &mut SqliteConnection,
    phone_number: &str,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let staff_member: StaffMember = get_staff_member_by_phone(conn, phone_number)?;

        diesel::delete(
            staff_member_specializations::table
                .filter(staff_member_specializations::staff_member_id.eq(staff_member.id)),
        )
        .execute(conn)?;

        let deleted: usize = diesel::delete(
            staff_members::table.filter(staff_members::staff_member_id.eq(staff_member.id)),
        )
        .execute(conn)?;

        if deleted == 0 {
            return Err(PersistenceError::StaffMemberNotFound(format!(
                "phone number {phone_number}"
            )));
        }

        info!(staff_member_id = staff_member.id, phone_number, "Deleted staff member");
        Ok(())
    })
}

/// Creates an organization under a freshly generated ID.
///
/// # Errors
///
/// Returns `RegistrationFailed` if every ID generation attempt failed.
pub fn create_organization(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Organization, PersistenceError> {
    for attempt in 1..=ID_GENERATION_ATTEMPTS {
        let organization_id: String = generate_opaque_id();

        let result: Result<usize, diesel::result::Error> =
            diesel::insert_into(organizations::table)
                .values((
                    organizations::organization_id.eq(&organization_id),
                    organizations::name.eq(name),
                ))
                .on_conflict_do_nothing()
                .execute(conn);

        match result {
            Ok(1) => {
                info!(organization_id = %organization_id, name, "Created organization");
                return Ok(Organization {
                    id: organization_id,
                    name: name.to_string(),
                });
            }
            Ok(_) => warn!(attempt, "Organization ID collision, regenerating"),
            Err(e) => warn!(attempt, error = %e, "Organization insert failed, regenerating ID"),
        }
    }

    Err(PersistenceError::RegistrationFailed(format!(
        "organization '{name}' after {ID_GENERATION_ATTEMPTS} attempts"
    )))
}

/// Renames an organization.
///
/// # Errors
///
/// Returns `OrganizationNotFound` if the organization does not exist.
pub fn update_organization(
    conn: &mut SqliteConnection,
    organization_id: &str,
    name: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        organizations::table.filter(organizations::organization_id.eq(organization_id)),
    )
    .set(organizations::name.eq(name))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::OrganizationNotFound(
            organization_id.to_string(),
        ));
    }

    Ok(())
}
