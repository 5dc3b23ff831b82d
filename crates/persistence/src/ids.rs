// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opaque identifier generation.
//!
//! Residents, specializations, organizations and requests are keyed by
//! random identifiers rather than sequential ones. A freshly generated
//! identifier can collide with an existing row, so inserts retry a
//! bounded number of times.

/// Number of generate-then-insert attempts before giving up.
pub const ID_GENERATION_ATTEMPTS: usize = 3;

/// Number of random bytes in an identifier.
const ID_BYTES: usize = 20;

/// Generates a new opaque identifier as 40 lowercase hex characters.
#[must_use]
pub fn generate_opaque_id() -> String {
    hex::encode(rand::random::<[u8; ID_BYTES]>())
}
