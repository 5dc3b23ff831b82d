// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the password policy.

use crate::{ApiError, PasswordPolicy, PasswordPolicyError};

#[test]
fn test_accepts_letters_and_digits_within_bounds() {
    let policy = PasswordPolicy::default();

    assert!(policy.validate("Secret1").is_ok());
    assert!(policy.validate("abcde").is_ok());
    assert!(policy.validate(&"a".repeat(30)).is_ok());
}

#[test]
fn test_rejects_short_password() {
    let policy = PasswordPolicy::default();

    assert_eq!(
        policy.validate("abcd"),
        Err(PasswordPolicyError::TooShort { min_length: 5 })
    );
}

#[test]
fn test_rejects_long_password() {
    let policy = PasswordPolicy::default();

    assert_eq!(
        policy.validate(&"a".repeat(31)),
        Err(PasswordPolicyError::TooLong { max_length: 30 })
    );
}

#[test]
fn test_rejects_symbols_and_spaces() {
    let policy = PasswordPolicy::default();

    assert_eq!(
        policy.validate("Secret 1"),
        Err(PasswordPolicyError::InvalidCharacters)
    );
    assert_eq!(
        policy.validate("Secret1!"),
        Err(PasswordPolicyError::InvalidCharacters)
    );
}

#[test]
fn test_policy_error_becomes_api_error() {
    let err: ApiError = PasswordPolicyError::TooShort { min_length: 5 }.into();

    assert_eq!(
        err,
        ApiError::PasswordPolicyViolation {
            message: String::from("Password must be at least 5 characters long"),
        }
    );
}
