// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff member, specialization and organization queries.

use std::collections::HashMap;

use diesel::SqliteConnection;
use diesel::dsl::count_star;
use diesel::prelude::*;
use hoa_tickets_domain::{
    Organization, RequestStatus, Specialization, StaffMember, StaffMemberStatus,
};
use tracing::debug;

use crate::diesel_schema::{
    organizations, requests, specializations, staff_member_specializations, staff_members,
};
use crate::error::PersistenceError;
use crate::queries::{LIKE_ESCAPE, like_pattern};

/// Diesel Queryable struct for staff member rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = staff_members)]
pub(crate) struct StaffMemberRow {
    staff_member_id: i64,
    phone_number: String,
    full_name: String,
    status: String,
}

impl StaffMemberRow {
    pub(crate) fn into_staff_member(self) -> Result<StaffMember, PersistenceError> {
        let status: StaffMemberStatus = self.status.parse()?;
        Ok(StaffMember {
            id: self.staff_member_id,
            phone_number: self.phone_number,
            full_name: self.full_name,
            status,
        })
    }
}

/// Diesel Queryable struct for specialization rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = specializations)]
pub(crate) struct SpecializationRow {
    specialization_id: String,
    title: String,
}

impl SpecializationRow {
    pub(crate) fn into_specialization(self) -> Specialization {
        Specialization {
            id: self.specialization_id,
            title: self.title,
        }
    }
}

/// Diesel Queryable struct for organization rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = organizations)]
pub(crate) struct OrganizationRow {
    organization_id: String,
    name: String,
}

impl OrganizationRow {
    pub(crate) fn into_organization(self) -> Organization {
        Organization {
            id: self.organization_id,
            name: self.name,
        }
    }
}

fn staff_member_not_found(what: String) -> impl FnOnce(diesel::result::Error) -> PersistenceError {
    move |e| match e {
        diesel::result::Error::NotFound => PersistenceError::StaffMemberNotFound(what),
        other => PersistenceError::from(other),
    }
}

/// Retrieves a staff member by phone number.
///
/// # Errors
///
/// Returns `StaffMemberNotFound` if no staff member has the phone number.
pub fn get_staff_member_by_phone(
    conn: &mut SqliteConnection,
    phone_number: &str,
) -> Result<StaffMember, PersistenceError> {
    debug!(phone_number, "Looking up staff member by phone number");

    staff_members::table
        .filter(staff_members::phone_number.eq(phone_number))
        .select(StaffMemberRow::as_select())
        .first::<StaffMemberRow>(conn)
        .map_err(staff_member_not_found(format!("phone number {phone_number}")))?
        .into_staff_member()
}

/// Retrieves a staff member by ID.
///
/// # Errors
///
/// Returns `StaffMemberNotFound` if the staff member does not exist.
pub fn get_staff_member_by_id(
    conn: &mut SqliteConnection,
    staff_member_id: i64,
) -> Result<StaffMember, PersistenceError> {
    staff_members::table
        .filter(staff_members::staff_member_id.eq(staff_member_id))
        .select(StaffMemberRow::as_select())
        .first::<StaffMemberRow>(conn)
        .map_err(staff_member_not_found(format!("ID {staff_member_id}")))?
        .into_staff_member()
}

/// Retrieves a specialization by ID.
///
/// # Errors
///
/// Returns `SpecializationNotFound` if the specialization does not exist.
pub fn get_specialization_by_id(
    conn: &mut SqliteConnection,
    specialization_id: &str,
) -> Result<Specialization, PersistenceError> {
    specializations::table
        .filter(specializations::specialization_id.eq(specialization_id))
        .select(SpecializationRow::as_select())
        .first::<SpecializationRow>(conn)
        .map(SpecializationRow::into_specialization)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                PersistenceError::SpecializationNotFound(specialization_id.to_string())
            }
            other => PersistenceError::from(other),
        })
}

/// Retrieves an organization by ID.
///
/// # Errors
///
/// Returns `OrganizationNotFound` if the organization does not exist.
pub fn get_organization_by_id(
    conn: &mut SqliteConnection,
    organization_id: &str,
) -> Result<Organization, PersistenceError> {
    organizations::table
        .filter(organizations::organization_id.eq(organization_id))
        .select(OrganizationRow::as_select())
        .first::<OrganizationRow>(conn)
        .map(OrganizationRow::into_organization)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                PersistenceError::OrganizationNotFound(organization_id.to_string())
            }
            other => PersistenceError::from(other),
        })
}

/// Lists the specializations a staff member currently holds.
///
/// Deactivated associations are excluded. Results are ordered by title.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_current_specializations(
    conn: &mut SqliteConnection,
    staff_member_id: i64,
) -> Result<Vec<Specialization>, PersistenceError> {
    let rows: Vec<SpecializationRow> = specializations::table
        .inner_join(staff_member_specializations::table)
        .filter(staff_member_specializations::staff_member_id.eq(staff_member_id))
        .filter(staff_member_specializations::is_active.eq(true))
        .select(SpecializationRow::as_select())
        .order(specializations::title.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(SpecializationRow::into_specialization)
        .collect())
}

/// Finds the least busy staff member holding a specialization.
///
/// Among staff members with an active association to the specialization,
/// returns the one with the fewest requests in status "assigned". Ties go
/// to the lowest staff member ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `specialization_id` - The job category
///
/// # Errors
///
/// Returns `StaffMemberNotFound` if nobody holds the specialization.
pub fn find_least_busy_by_specialization(
    conn: &mut SqliteConnection,
    specialization_id: &str,
) -> Result<StaffMember, PersistenceError> {
    let candidates: Vec<StaffMemberRow> = staff_members::table
        .inner_join(staff_member_specializations::table)
        .filter(staff_member_specializations::specialization_id.eq(specialization_id))
        .filter(staff_member_specializations::is_active.eq(true))
        .select(StaffMemberRow::as_select())
        .order(staff_members::staff_member_id.asc())
        .load(conn)?;

    let candidate_ids: Vec<i64> = candidates.iter().map(|row| row.staff_member_id).collect();

    let open_counts: HashMap<i64, i64> = requests::table
        .filter(requests::responsible_id.eq_any(candidate_ids))
        .filter(requests::status.eq(RequestStatus::Assigned.as_str()))
        .group_by(requests::responsible_id)
        .select((requests::responsible_id, count_star()))
        .load::<(Option<i64>, i64)>(conn)?
        .into_iter()
        .filter_map(|(id, count)| id.map(|id| (id, count)))
        .collect();

    // min_by_key keeps the first minimum, and candidates are ordered by ID.
    let least_busy: StaffMemberRow = candidates
        .into_iter()
        .min_by_key(|row| open_counts.get(&row.staff_member_id).copied().unwrap_or(0))
        .ok_or_else(|| {
            PersistenceError::StaffMemberNotFound(format!(
                "no staff member holds specialization {specialization_id}"
            ))
        })?;

    debug!(
        specialization_id,
        staff_member_id = least_busy.staff_member_id,
        "Selected least busy staff member"
    );

    least_busy.into_staff_member()
}

/// Lists specializations whose title contains `pattern`, ordered by title.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_specializations(
    conn: &mut SqliteConnection,
    pattern: &str,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Specialization>, i64), PersistenceError> {
    let pattern: String = like_pattern(pattern);

    let total: i64 = specializations::table
        .filter(specializations::title.like(&pattern).escape(LIKE_ESCAPE))
        .count()
        .get_result(conn)?;

    let rows: Vec<SpecializationRow> = specializations::table
        .filter(specializations::title.like(&pattern).escape(LIKE_ESCAPE))
        .select(SpecializationRow::as_select())
        .order(specializations::title.asc())
        .limit(limit)
        .offset(offset)
        .load(conn)?;

    Ok((
        rows.into_iter()
            .map(SpecializationRow::into_specialization)
            .collect(),
        total,
    ))
}

/// Lists organizations whose name contains `pattern`, ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_organizations(
    conn: &mut SqliteConnection,
    pattern: &str,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Organization>, i64), PersistenceError> {
    let pattern: String = like_pattern(pattern);

    let total: i64 = organizations::table
        .filter(organizations::name.like(&pattern).escape(LIKE_ESCAPE))
        .count()
        .get_result(conn)?;

    let rows: Vec<OrganizationRow> = organizations::table
        .filter(organizations::name.like(&pattern).escape(LIKE_ESCAPE))
        .select(OrganizationRow::as_select())
        .order((organizations::name.asc(), organizations::organization_id.asc()))
        .limit(limit)
        .offset(offset)
        .load(conn)?;

    Ok((
        rows.into_iter()
            .map(OrganizationRow::into_organization)
            .collect(),
        total,
    ))
}
