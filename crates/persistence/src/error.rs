// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A stored value could not be mapped back to a domain value.
    CorruptRow(String),
    /// Hashing a password failed.
    PasswordHashFailed(String),
    /// A row with the same natural key already exists.
    AlreadyExists(String),
    /// No login credential exists for the phone number.
    CredentialNotFound(String),
    /// The password did not match the stored hash.
    WrongPassword,
    /// Every identifier generation attempt failed.
    RegistrationFailed(String),
    /// The requested resident was not found.
    ResidentNotFound(String),
    /// The requested house was not found.
    HouseNotFound(i64),
    /// The resident is not associated with the house.
    AssociationNotFound {
        /// The resident.
        resident_id: String,
        /// The house.
        house_id: i64,
    },
    /// The requested staff member (or active assignment) was not found.
    StaffMemberNotFound(String),
    /// The staff member could not be created.
    CreatingMemberFailed(String),
    /// The requested specialization was not found.
    SpecializationNotFound(String),
    /// The requested organization was not found.
    OrganizationNotFound(String),
    /// The requested maintenance request was not found.
    RequestNotFound(String),
    /// The maintenance request could not be created.
    CreatingRequestFailed(String),
    /// The requested session was not found.
    SessionNotFound(String),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl PersistenceError {
    /// Returns true for every "row does not exist" variant.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CredentialNotFound(_)
                | Self::ResidentNotFound(_)
                | Self::HouseNotFound(_)
                | Self::AssociationNotFound { .. }
                | Self::StaffMemberNotFound(_)
                | Self::SpecializationNotFound(_)
                | Self::OrganizationNotFound(_)
                | Self::RequestNotFound(_)
                | Self::SessionNotFound(_)
                | Self::NotFound(_)
        )
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::CorruptRow(msg) => write!(f, "Corrupt row: {msg}"),
            Self::PasswordHashFailed(msg) => write!(f, "Failed to hash password: {msg}"),
            Self::AlreadyExists(msg) => write!(f, "Already exists: {msg}"),
            Self::CredentialNotFound(phone) => write!(f, "User not found: {phone}"),
            Self::WrongPassword => write!(f, "Wrong password"),
            Self::RegistrationFailed(msg) => write!(f, "Registration failed: {msg}"),
            Self::ResidentNotFound(msg) => write!(f, "Resident not found: {msg}"),
            Self::HouseNotFound(house_id) => write!(f, "No house found with ID {house_id}"),
            Self::AssociationNotFound {
                resident_id,
                house_id,
            } => write!(
                f,
                "Resident {resident_id} is not associated with house {house_id}"
            ),
            Self::StaffMemberNotFound(msg) => write!(f, "Staff member not found: {msg}"),
            Self::CreatingMemberFailed(msg) => write!(f, "Creating staff member failed: {msg}"),
            Self::SpecializationNotFound(msg) => write!(f, "Specialization not found: {msg}"),
            Self::OrganizationNotFound(msg) => write!(f, "Organization not found: {msg}"),
            Self::RequestNotFound(msg) => write!(f, "No requests found: {msg}"),
            Self::CreatingRequestFailed(msg) => write!(f, "Creating request failed: {msg}"),
            Self::SessionNotFound(msg) => write!(f, "Session not found: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for PersistenceError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::PasswordHashFailed(err.to_string())
    }
}

impl From<hoa_tickets_domain::DomainError> for PersistenceError {
    fn from(err: hoa_tickets_domain::DomainError) -> Self {
        Self::CorruptRow(err.to_string())
    }
}
