// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stored timestamp format.
//!
//! Timestamps are UTC text of fixed width so that lexical order equals
//! chronological order, which lets Diesel sort and compare them directly.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::error::PersistenceError;

const STORED_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z");

/// Formats a point in time for storage, normalized to UTC.
///
/// # Errors
///
/// Returns an error if the value cannot be formatted.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(time::UtcOffset::UTC)
        .format(STORED_FORMAT)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

/// Returns the current server time in stored form.
///
/// # Errors
///
/// Returns an error if the value cannot be formatted.
pub fn now_timestamp() -> Result<String, PersistenceError> {
    format_timestamp(OffsetDateTime::now_utc())
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns `CorruptRow` if the text is not in stored form.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    PrimitiveDateTime::parse(value, STORED_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| PersistenceError::CorruptRow(format!("Bad timestamp '{value}': {e}")))
}
