// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Shortest accepted phone number, in digits.
pub const PHONE_NUMBER_MIN_LENGTH: usize = 5;
/// Longest accepted phone number, in digits.
pub const PHONE_NUMBER_MAX_LENGTH: usize = 40;

/// Validates a phone number used as a login.
///
/// # Arguments
///
/// * `phone_number` - The phone number to validate
///
/// # Errors
///
/// Returns an error if:
/// - The phone number is shorter than 5 or longer than 40 characters
/// - The phone number contains anything other than ASCII digits
pub fn validate_phone_number(phone_number: &str) -> Result<(), DomainError> {
    let length: usize = phone_number.len();
    if !(PHONE_NUMBER_MIN_LENGTH..=PHONE_NUMBER_MAX_LENGTH).contains(&length) {
        return Err(DomainError::InvalidPhoneNumber(format!(
            "Phone number must be between {PHONE_NUMBER_MIN_LENGTH} and {PHONE_NUMBER_MAX_LENGTH} digits"
        )));
    }

    if !phone_number.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::InvalidPhoneNumber(String::from(
            "Phone number must contain only digits",
        )));
    }

    Ok(())
}

/// Validates a person's full name.
///
/// # Errors
///
/// Returns an error if the name is empty or only whitespace.
pub fn validate_full_name(full_name: &str) -> Result<(), DomainError> {
    if full_name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Full name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a house address.
///
/// # Errors
///
/// Returns an error if the address is empty or only whitespace.
pub fn validate_address(address: &str) -> Result<(), DomainError> {
    if address.trim().is_empty() {
        return Err(DomainError::InvalidAddress(String::from(
            "Address cannot be empty",
        )));
    }
    Ok(())
}

/// Validates the complaint text of a request.
///
/// # Errors
///
/// Returns an error if the complaint is empty or only whitespace.
pub fn validate_complaint(complaint: &str) -> Result<(), DomainError> {
    if complaint.trim().is_empty() {
        return Err(DomainError::InvalidComplaint(String::from(
            "Complaint cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a specialization (job) title.
///
/// # Errors
///
/// Returns an error if the title is empty or only whitespace.
pub fn validate_specialization_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::InvalidSpecializationTitle(String::from(
            "Specialization title cannot be empty",
        )));
    }
    Ok(())
}

/// Validates an organization name.
///
/// # Errors
///
/// Returns an error if the name is empty or only whitespace.
pub fn validate_organization_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidOrganizationName(String::from(
            "Organization name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates the cost of a repair.
///
/// # Errors
///
/// Returns an error if the cost is negative, NaN or infinite.
pub fn validate_cost(cost: f64) -> Result<(), DomainError> {
    if !cost.is_finite() {
        return Err(DomainError::InvalidCost(String::from(
            "Cost must be a finite number",
        )));
    }
    if cost < 0.0 {
        return Err(DomainError::InvalidCost(String::from(
            "Cost cannot be negative",
        )));
    }
    Ok(())
}

/// Parses a database-assigned integer identifier (house, staff member).
///
/// # Arguments
///
/// * `field` - The name of the field, for error reporting
/// * `value` - The raw value
///
/// # Errors
///
/// Returns an error if the value is not a positive integer.
pub fn parse_numeric_id(field: &str, value: &str) -> Result<i64, DomainError> {
    match value.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(DomainError::InvalidIdentifier {
            field: field.to_string(),
            message: format!("'{value}' is not a valid identifier"),
        }),
    }
}

/// Validates an opaque generated identifier (resident, request,
/// specialization, organization).
///
/// # Errors
///
/// Returns an error if the value is empty or only whitespace.
pub fn validate_opaque_id(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidIdentifier {
            field: field.to_string(),
            message: String::from("Identifier cannot be empty"),
        });
    }
    Ok(())
}
