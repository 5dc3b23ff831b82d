// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use hoa_tickets_audit::Actor;
use hoa_tickets_persistence::{
    Persistence, PersistenceError, SessionData, format_timestamp, now_timestamp, parse_timestamp,
};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Roles a session may carry.
///
/// A phone number may hold both a resident and a staff profile, but a
/// session records exactly one role, chosen at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Residents file and follow their own requests.
    Resident,
    /// Staff manage users, the directory and the request panel.
    ///
    /// Staff may also use every resident endpoint.
    Staff,
}

impl Role {
    /// Returns the stored name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::Staff => "staff",
        }
    }

    /// Parses a stored role name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "resident" => Some(Self::Resident),
            "staff" => Some(Self::Staff),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated caller with the role chosen at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The caller's phone number.
    pub phone_number: String,
    /// The session role.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `phone_number` - The caller's phone number
    /// * `role` - The role recorded in the session
    #[must_use]
    pub const fn new(phone_number: String, role: Role) -> Self {
        Self { phone_number, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.phone_number.clone(), self.role.as_str().to_string())
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor's role is one of `allowed`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `action` - The action being attempted, for the error message
    /// * `allowed` - The roles permitted to perform it
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if the role is not allowed.
    pub fn require_role(
        actor: &AuthenticatedActor,
        action: &str,
        allowed: &[Role],
    ) -> Result<(), AuthError> {
        if allowed.contains(&actor.role) {
            return Ok(());
        }

        let required_role: String = allowed
            .iter()
            .map(Role::as_str)
            .collect::<Vec<&str>>()
            .join(" or ");
        warn!(
            phone_number = %actor.phone_number,
            role = %actor.role,
            action,
            "Role not permitted"
        );
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role,
        })
    }

    /// Checks that the actor holds the staff role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` for residents.
    pub fn authorize_staff_action(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        Self::require_role(actor, action, &[Role::Staff])
    }

    /// Checks that the actor may use the resident area.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if the role is not allowed.
    pub fn authorize_resident_action(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        Self::require_role(actor, action, &[Role::Resident, Role::Staff])
    }
}

/// Authentication service for session management.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Session lifetime (30 days).
    pub const SESSION_LIFETIME: Duration = Duration::days(30);

    /// Number of random bytes in a session token.
    const TOKEN_BYTES: usize = 32;

    /// Verifies credentials and opens a session.
    ///
    /// The staff role takes precedence when the phone number has both a
    /// staff and a resident profile. Expired sessions are purged first.
    ///
    /// This runs bcrypt while `persistence` is borrowed. Callers sharing
    /// storage behind a lock should run [`Self::stored_password_hash`],
    /// [`Self::verify_password`] and [`Self::open_session`] separately.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `phone_number` - The login phone number
    /// * `password` - The plain-text password
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`)
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for unknown phone numbers or wrong
    /// passwords, `Unauthorized` if the user has no role, and
    /// `SessionStore` if storage fails.
    pub fn login(
        persistence: &mut Persistence,
        phone_number: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor), AuthError> {
        let password_hash: String = Self::stored_password_hash(persistence, phone_number)?;
        Self::verify_password(phone_number, password, &password_hash)?;
        Self::open_session(persistence, phone_number)
    }

    /// Loads the password hash for a login.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for an unknown phone number, with the
    /// same reason as a wrong password.
    pub fn stored_password_hash(
        persistence: &mut Persistence,
        phone_number: &str,
    ) -> Result<String, AuthError> {
        persistence
            .get_password_hash(phone_number)
            .map_err(|e| match e {
                PersistenceError::CredentialNotFound(_) => {
                    debug!(phone_number, "Credential check failed");
                    Self::invalid_credentials()
                }
                other => Self::map_persistence_error(other),
            })
    }

    /// Checks a password against a stored hash. Needs no storage.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the password does not match, or
    /// `SessionStore` if the stored hash is malformed.
    pub fn verify_password(
        phone_number: &str,
        password: &str,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let matches: bool = hoa_tickets_persistence::verify_password(password, password_hash)
            .map_err(Self::map_persistence_error)?;
        if matches {
            Ok(())
        } else {
            debug!(phone_number, "Credential check failed");
            Err(Self::invalid_credentials())
        }
    }

    /// Opens a session for a phone number whose password was verified.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the user has no role, and `SessionStore`
    /// if storage fails.
    pub fn open_session(
        persistence: &mut Persistence,
        phone_number: &str,
    ) -> Result<(String, AuthenticatedActor), AuthError> {
        let role: Role = Self::resolve_role(persistence, phone_number)?;

        let now: String = now_timestamp().map_err(Self::map_persistence_error)?;
        let purged: usize = persistence
            .delete_expired_sessions(&now)
            .map_err(Self::map_persistence_error)?;
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }

        let session_token: String = Self::generate_session_token();
        let expires_at: String =
            format_timestamp(OffsetDateTime::now_utc() + Self::SESSION_LIFETIME)
                .map_err(Self::map_persistence_error)?;

        persistence
            .create_session(&session_token, phone_number, role.as_str(), &expires_at)
            .map_err(Self::map_persistence_error)?;

        info!(phone_number, role = %role, "User logged in");

        Ok((
            session_token,
            AuthenticatedActor::new(phone_number.to_string(), role),
        ))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// An expired session is deleted and rejected.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the session is unknown, expired or
    /// carries an unknown role.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<AuthenticatedActor, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            parse_timestamp(&session.expires_at).map_err(Self::map_persistence_error)?;

        if OffsetDateTime::now_utc() >= expires_at {
            debug!(session_id = session.session_id, "Rejecting expired session");
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let role: Role =
            Role::from_name(&session.role).ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {}", session.role),
            })?;

        Ok(AuthenticatedActor::new(session.phone_number, role))
    }

    /// Logs out by deleting the session.
    ///
    /// Logging out of a session that no longer exists succeeds.
    ///
    /// # Errors
    ///
    /// Returns `SessionStore` if the delete fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        match persistence.delete_session(session_token) {
            Ok(()) | Err(PersistenceError::SessionNotFound(_)) => Ok(()),
            Err(e) => Err(Self::map_persistence_error(e)),
        }
    }

    /// Picks the session role for a phone number, staff first.
    fn resolve_role(persistence: &mut Persistence, phone_number: &str) -> Result<Role, AuthError> {
        match persistence.get_staff_member_by_phone(phone_number) {
            Ok(_) => return Ok(Role::Staff),
            Err(PersistenceError::StaffMemberNotFound(_)) => {}
            Err(e) => return Err(Self::map_persistence_error(e)),
        }

        match persistence.get_resident_by_phone(phone_number) {
            Ok(_) => Ok(Role::Resident),
            Err(PersistenceError::ResidentNotFound(_)) => {
                warn!(phone_number, "Login for a user without a role");
                Err(AuthError::Unauthorized {
                    action: String::from("login"),
                    required_role: String::from("resident or staff"),
                })
            }
            Err(e) => Err(Self::map_persistence_error(e)),
        }
    }

    /// Generates a random session token as lowercase hex.
    fn generate_session_token() -> String {
        hex::encode(rand::random::<[u8; Self::TOKEN_BYTES]>())
    }

    fn invalid_credentials() -> AuthError {
        AuthError::AuthenticationFailed {
            reason: String::from("Invalid phone number or password"),
        }
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        match err {
            PersistenceError::SessionNotFound(reason) => AuthError::AuthenticationFailed { reason },
            _ => AuthError::SessionStore {
                message: err.to_string(),
            },
        }
    }
}
