// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Use-case functions.
//!
//! Every handler checks the caller's role first, then validates input, then
//! touches storage. Handlers are synchronous; the transport layer decides
//! where they run.

pub mod accounts;
pub mod requests;
pub mod residents;
pub mod staff;

use hoa_tickets_domain::{parse_numeric_id, validate_opaque_id};

use crate::error::{ApiError, translate_domain_error};

/// Returns the trimmed value of a required field.
///
/// # Errors
///
/// Returns `InvalidInput` if the field is missing or blank.
fn require_field<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: String::from("Value is required"),
        }),
    }
}

/// Parses a required numeric identifier (house, staff member).
fn require_numeric_id(field: &str, value: Option<&str>) -> Result<i64, ApiError> {
    let raw: &str = require_field(field, value)?;
    parse_numeric_id(field, raw).map_err(translate_domain_error)
}

/// Returns a required opaque identifier (resident, request, specialization,
/// organization).
fn require_opaque_id<'a>(
    field: &str,
    value: Option<&'a str>,
) -> Result<&'a str, ApiError> {
    let raw: &str = require_field(field, value)?;
    validate_opaque_id(field, raw).map_err(translate_domain_error)?;
    Ok(raw)
}

/// Returns the trimmed value of an optional field, treating blanks as absent.
fn optional_field(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
