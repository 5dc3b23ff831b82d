// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password hashing.
//!
//! Both functions are CPU-bound and need no connection, so callers can
//! run them without holding the storage lock.

use crate::error::PersistenceError;

/// Hashes a password with bcrypt at the given cost.
///
/// # Errors
///
/// Returns `PasswordHashFailed` if hashing fails.
pub fn hash_password(password: &str, cost: u32) -> Result<String, PersistenceError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Checks a password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns `PasswordHashFailed` if the stored hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    Ok(bcrypt::verify(password, password_hash)?)
}
