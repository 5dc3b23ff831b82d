// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use hoa_tickets_domain::{Resident, StaffMember, User};
use serde::{Deserialize, Serialize};

/// A stored login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub phone_number: String,
    /// The role chosen at login ("resident" or "staff").
    pub role: String,
    pub created_at: String,
    pub expires_at: String,
}

/// Everything created by a single account registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredAccount {
    pub user: User,
    pub resident: Option<Resident>,
    pub staff_member: Option<StaffMember>,
}
