// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the HOA maintenance ticketing system.
//!
//! This crate owns the relational store: login credentials, residents and
//! houses, staff members with their specializations, organizations,
//! maintenance requests with their audit trail, and login sessions. It is
//! built on Diesel over `SQLite`.
//!
//! ## Database
//!
//! - In-memory databases (`Persistence::new_in_memory`) back every test.
//!   Each call gets its own shared-cache database name, so tests are
//!   isolated without relying on timing.
//! - File databases (`Persistence::new_with_file`) run in WAL mode.
//! - Migrations are embedded and applied on open. Foreign key enforcement
//!   is verified before the adapter is handed out.
//!
//! ## Coordination
//!
//! The database is the only shared mutable resource. Uniqueness,
//! idempotent inserts and conditional updates are delegated to it
//! (`ON CONFLICT DO NOTHING`, constraint violations, affected row counts)
//! rather than to application-level locks. Multi-row changes run in a
//! single transaction.
//!
//! ## Testing Philosophy
//!
//! - Tests use in-memory `SQLite` with the minimum bcrypt cost
//! - No test depends on wall-clock ordering beyond stored timestamps

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use hoa_tickets_audit::{Actor, AuditEvent};
use hoa_tickets_domain::{
    House, NewRequest, Organization, Request, RequestFilter, Resident, ResidentRequestSort,
    Specialization, StaffMember, User,
};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod ids;
mod mutations;
mod passwords;
mod queries;
mod timestamps;

#[cfg(test)]
mod tests;

pub use data_models::{RegisteredAccount, SessionData};
pub use error::PersistenceError;
pub use ids::ID_GENERATION_ATTEMPTS;
pub use passwords::{hash_password, verify_password};
pub use timestamps::{format_timestamp, now_timestamp, parse_timestamp};

/// Persistence adapter for every repository in the system.
///
/// Methods take `&mut self` because a `SqliteConnection` is not shareable;
/// callers serialize access (the server wraps the adapter in a mutex).
pub struct Persistence {
    conn: SqliteConnection,
    hash_cost: u32,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("hash_cost", &self.hash_cost)
            .finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            hash_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Invalid database path"))
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            hash_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Sets the bcrypt cost used when hashing new passwords.
    ///
    /// Tests use `bcrypt` minimum cost (4) to stay fast.
    #[must_use]
    pub const fn with_password_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Returns the bcrypt cost used for new passwords.
    #[must_use]
    pub const fn password_hash_cost(&self) -> u32 {
        self.hash_cost
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Identity
    // ========================================================================

    /// Registers a login credential.
    ///
    /// The password is hashed before anything is written; a hashing failure
    /// leaves no partial user.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the phone number is registered, or
    /// `PasswordHashFailed` if hashing fails.
    pub fn register_user(
        &mut self,
        phone_number: &str,
        password: &str,
    ) -> Result<User, PersistenceError> {
        let password_hash: String = hash_password(password, self.hash_cost)?;
        mutations::credentials::insert_credential(&mut self.conn, phone_number, &password_hash)
    }

    /// Checks a phone number and password.
    ///
    /// This verifies the hash while `self` is borrowed. Callers sharing
    /// the adapter behind a lock should use [`Self::get_password_hash`]
    /// and [`verify_password`] instead.
    ///
    /// # Errors
    ///
    /// Returns `CredentialNotFound` or `WrongPassword`.
    pub fn authorize_user(
        &mut self,
        phone_number: &str,
        password: &str,
    ) -> Result<User, PersistenceError> {
        let password_hash: String = self.get_password_hash(phone_number)?;
        if !verify_password(password, &password_hash)? {
            return Err(PersistenceError::WrongPassword);
        }
        Ok(User::new(phone_number.to_string()))
    }

    /// Returns the stored password hash for a phone number.
    ///
    /// # Errors
    ///
    /// Returns `CredentialNotFound` if no credential exists.
    pub fn get_password_hash(&mut self, phone_number: &str) -> Result<String, PersistenceError> {
        queries::credentials::find_password_hash(&mut self.conn, phone_number)
    }

    /// Returns true if a credential exists for the phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn credential_exists(&mut self, phone_number: &str) -> Result<bool, PersistenceError> {
        queries::credentials::credential_exists(&mut self.conn, phone_number)
    }

    /// Deletes only the login credential for a phone number.
    ///
    /// # Errors
    ///
    /// Returns `CredentialNotFound` if no credential exists.
    pub fn delete_credential(&mut self, phone_number: &str) -> Result<(), PersistenceError> {
        mutations::credentials::delete_credential(&mut self.conn, phone_number)
    }

    /// Lists users whose phone number contains `phone_filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(
        &mut self,
        phone_filter: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64), PersistenceError> {
        queries::credentials::list_users(&mut self.conn, phone_filter, limit, offset)
    }

    /// Registers a credential plus resident and/or staff profiles atomically.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error; nothing is kept on failure.
    pub fn register_account(
        &mut self,
        phone_number: &str,
        password: &str,
        full_name: &str,
        as_resident: bool,
        as_staff: bool,
    ) -> Result<RegisteredAccount, PersistenceError> {
        let password_hash: String = hash_password(password, self.hash_cost)?;
        self.register_account_with_hash(
            phone_number,
            &password_hash,
            full_name,
            as_resident,
            as_staff,
        )
    }

    /// Like [`Self::register_account`], with the password already hashed.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error; nothing is kept on failure.
    pub fn register_account_with_hash(
        &mut self,
        phone_number: &str,
        password_hash: &str,
        full_name: &str,
        as_resident: bool,
        as_staff: bool,
    ) -> Result<RegisteredAccount, PersistenceError> {
        mutations::accounts::register_account(
            &mut self.conn,
            phone_number,
            password_hash,
            full_name,
            as_resident,
            as_staff,
        )
    }

    /// Removes a user with their resident and staff profiles and sessions.
    ///
    /// # Errors
    ///
    /// Returns `CredentialNotFound` if the phone number is not registered.
    pub fn delete_user(&mut self, phone_number: &str) -> Result<(), PersistenceError> {
        mutations::accounts::delete_user(&mut self.conn, phone_number)
    }

    // ========================================================================
    // Residents & Houses
    // ========================================================================

    /// Registers a resident under a generated ID.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` or `RegistrationFailed`.
    pub fn register_resident(
        &mut self,
        phone_number: &str,
        full_name: &str,
    ) -> Result<Resident, PersistenceError> {
        mutations::residents::register_resident(&mut self.conn, phone_number, full_name)
    }

    /// Registers a house.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the address is taken.
    pub fn register_house(&mut self, address: &str) -> Result<House, PersistenceError> {
        mutations::residents::register_house(&mut self.conn, address)
    }

    /// Associates a resident with a house; repeating it is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ResidentNotFound` or `HouseNotFound`.
    pub fn add_resident_house(
        &mut self,
        resident_id: &str,
        house_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::residents::add_resident_house(&mut self.conn, resident_id, house_id)
    }

    /// Removes a resident-house association.
    ///
    /// # Errors
    ///
    /// Returns `AssociationNotFound` if the pair was not associated.
    pub fn delete_resident_house(
        &mut self,
        resident_id: &str,
        house_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::residents::delete_resident_house(&mut self.conn, resident_id, house_id)
    }

    /// Retrieves a resident by phone number.
    ///
    /// # Errors
    ///
    /// Returns `ResidentNotFound` if absent.
    pub fn get_resident_by_phone(
        &mut self,
        phone_number: &str,
    ) -> Result<Resident, PersistenceError> {
        queries::residents::get_resident_by_phone(&mut self.conn, phone_number)
    }

    /// Retrieves a resident by ID.
    ///
    /// # Errors
    ///
    /// Returns `ResidentNotFound` if absent.
    pub fn get_resident_by_id(&mut self, resident_id: &str) -> Result<Resident, PersistenceError> {
        queries::residents::get_resident_by_id(&mut self.conn, resident_id)
    }

    /// Retrieves a house by ID.
    ///
    /// # Errors
    ///
    /// Returns `HouseNotFound` if absent.
    pub fn get_house_by_id(&mut self, house_id: i64) -> Result<House, PersistenceError> {
        queries::residents::get_house_by_id(&mut self.conn, house_id)
    }

    /// Returns true only if the resident is associated with the house.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn validate_resident_house(
        &mut self,
        resident_id: &str,
        house_id: i64,
    ) -> Result<bool, PersistenceError> {
        queries::residents::validate_resident_house(&mut self.conn, resident_id, house_id)
    }

    /// Lists houses whose address contains `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_houses(
        &mut self,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<House>, i64), PersistenceError> {
        queries::residents::list_houses(&mut self.conn, pattern, limit, offset)
    }

    /// Lists the houses a resident is associated with.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_resident_houses(
        &mut self,
        resident_id: &str,
    ) -> Result<Vec<House>, PersistenceError> {
        queries::residents::find_resident_houses(&mut self.conn, resident_id)
    }

    /// Deletes a resident by phone number.
    ///
    /// # Errors
    ///
    /// Returns `ResidentNotFound` if absent.
    pub fn delete_resident_by_phone(&mut self, phone_number: &str) -> Result<(), PersistenceError> {
        mutations::residents::delete_resident_by_phone(&mut self.conn, phone_number)
    }

    /// Changes a house's address.
    ///
    /// # Errors
    ///
    /// Returns `HouseNotFound` or `AlreadyExists`.
    pub fn update_house_address(
        &mut self,
        house_id: i64,
        address: &str,
    ) -> Result<(), PersistenceError> {
        mutations::residents::update_house_address(&mut self.conn, house_id, address)
    }

    // ========================================================================
    // Staff, Specializations & Organizations
    // ========================================================================

    /// Registers an active staff member.
    ///
    /// # Errors
    ///
    /// Returns `CreatingMemberFailed` on conflict.
    pub fn register_staff_member(
        &mut self,
        phone_number: &str,
        full_name: &str,
    ) -> Result<StaffMember, PersistenceError> {
        mutations::staff::register_staff_member(&mut self.conn, phone_number, full_name)
    }

    /// Registers a specialization under a generated ID.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` or `RegistrationFailed`.
    pub fn register_specialization(
        &mut self,
        title: &str,
    ) -> Result<Specialization, PersistenceError> {
        mutations::staff::register_specialization(&mut self.conn, title)
    }

    /// Gives a staff member a specialization, reactivating it if present.
    ///
    /// # Errors
    ///
    /// Returns `StaffMemberNotFound` or `SpecializationNotFound`.
    pub fn add_staff_member_specialization(
        &mut self,
        staff_member_id: i64,
        specialization_id: &str,
    ) -> Result<(), PersistenceError> {
        mutations::staff::add_staff_member_specialization(
            &mut self.conn,
            staff_member_id,
            specialization_id,
        )
    }

    /// Deactivates a staff member's specialization.
    ///
    /// # Errors
    ///
    /// Returns `StaffMemberNotFound` if no active association matched.
    pub fn deactivate_staff_member_specialization(
        &mut self,
        staff_member_id: i64,
        specialization_id: &str,
    ) -> Result<(), PersistenceError> {
        mutations::staff::deactivate_staff_member_specialization(
            &mut self.conn,
            staff_member_id,
            specialization_id,
        )
    }

    /// Lists a staff member's active specializations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_current_specializations(
        &mut self,
        staff_member_id: i64,
    ) -> Result<Vec<Specialization>, PersistenceError> {
        queries::staff::find_current_specializations(&mut self.conn, staff_member_id)
    }

    /// Retrieves a staff member by phone number.
    ///
    /// # Errors
    ///
    /// Returns `StaffMemberNotFound` if absent.
    pub fn get_staff_member_by_phone(
        &mut self,
        phone_number: &str,
    ) -> Result<StaffMember, PersistenceError> {
        queries::staff::get_staff_member_by_phone(&mut self.conn, phone_number)
    }

    /// Retrieves a staff member by ID.
    ///
    /// # Errors
    ///
    /// Returns `StaffMemberNotFound` if absent.
    pub fn get_staff_member_by_id(
        &mut self,
        staff_member_id: i64,
    ) -> Result<StaffMember, PersistenceError> {
        queries::staff::get_staff_member_by_id(&mut self.conn, staff_member_id)
    }

    /// Deletes a staff member and their specialization associations.
    ///
    /// # Errors
    ///
    /// Returns `StaffMemberNotFound` if absent.
    pub fn delete_staff_member_by_phone(
        &mut self,
        phone_number: &str,
    ) -> Result<(), PersistenceError> {
        mutations::staff::delete_staff_member_by_phone(&mut self.conn, phone_number)
    }

    /// Finds the qualified staff member with the fewest assigned requests.
    ///
    /// # Errors
    ///
    /// Returns `StaffMemberNotFound` if nobody holds the specialization.
    pub fn find_least_busy_by_specialization(
        &mut self,
        specialization_id: &str,
    ) -> Result<StaffMember, PersistenceError> {
        queries::staff::find_least_busy_by_specialization(&mut self.conn, specialization_id)
    }

    /// Retrieves a specialization by ID.
    ///
    /// # Errors
    ///
    /// Returns `SpecializationNotFound` if absent.
    pub fn get_specialization_by_id(
        &mut self,
        specialization_id: &str,
    ) -> Result<Specialization, PersistenceError> {
        queries::staff::get_specialization_by_id(&mut self.conn, specialization_id)
    }

    /// Lists specializations whose title contains `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_specializations(
        &mut self,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Specialization>, i64), PersistenceError> {
        queries::staff::list_specializations(&mut self.conn, pattern, limit, offset)
    }

    /// Creates an organization under a generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationFailed` if every attempt failed.
    pub fn create_organization(&mut self, name: &str) -> Result<Organization, PersistenceError> {
        mutations::staff::create_organization(&mut self.conn, name)
    }

    /// Renames an organization.
    ///
    /// # Errors
    ///
    /// Returns `OrganizationNotFound` if absent.
    pub fn update_organization(
        &mut self,
        organization_id: &str,
        name: &str,
    ) -> Result<(), PersistenceError> {
        mutations::staff::update_organization(&mut self.conn, organization_id, name)
    }

    /// Retrieves an organization by ID.
    ///
    /// # Errors
    ///
    /// Returns `OrganizationNotFound` if absent.
    pub fn get_organization_by_id(
        &mut self,
        organization_id: &str,
    ) -> Result<Organization, PersistenceError> {
        queries::staff::get_organization_by_id(&mut self.conn, organization_id)
    }

    /// Lists organizations whose name contains `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_organizations(
        &mut self,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Organization>, i64), PersistenceError> {
        queries::staff::list_organizations(&mut self.conn, pattern, limit, offset)
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Files a request and records it in the audit trail.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `CreatingRequestFailed`.
    pub fn create_request(
        &mut self,
        new_request: &NewRequest,
        actor: &Actor,
    ) -> Result<Request, PersistenceError> {
        mutations::requests::create_request(&mut self.conn, new_request, actor)
    }

    /// Retrieves a request by ID.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if absent.
    pub fn get_request_by_id(&mut self, request_id: &str) -> Result<Request, PersistenceError> {
        queries::requests::get_request_by_id(&mut self.conn, request_id)
    }

    /// Lists the requests of the resident with the given phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_resident_requests(
        &mut self,
        phone_number: &str,
        sort: ResidentRequestSort,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Request>, i64), PersistenceError> {
        queries::requests::list_resident_requests(&mut self.conn, phone_number, sort, limit, offset)
    }

    /// Lists requests matching a filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn filter_requests(
        &mut self,
        filter: &RequestFilter,
    ) -> Result<(Vec<Request>, i64), PersistenceError> {
        queries::requests::filter_requests(&mut self.conn, filter)
    }

    /// Rewrites a request and records the change in the audit trail.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if absent.
    pub fn update_request(
        &mut self,
        request: &Request,
        actor: &Actor,
    ) -> Result<(), PersistenceError> {
        mutations::requests::update_request(&mut self.conn, request, actor)
    }

    /// Deletes a request.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if absent.
    pub fn delete_request(&mut self, request_id: &str) -> Result<(), PersistenceError> {
        mutations::requests::delete_request(&mut self.conn, request_id)
    }

    /// Retrieves a request's audit trail, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_request_history(
        &mut self,
        request_id: &str,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_request_history(&mut self.conn, request_id)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        phone_number: &str,
        role: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::create_session(
            &mut self.conn,
            session_token,
            phone_number,
            role,
            expires_at,
        )
    }

    /// Retrieves a session by token, expired or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::sessions::get_session_by_token(&mut self.conn, session_token)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if absent.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes every session that expired at or before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_expired_sessions(&mut self.conn, now)
    }
}
