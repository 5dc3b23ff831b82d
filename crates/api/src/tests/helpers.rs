// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use hoa_tickets_domain::{House, Resident, StaffMember};
use hoa_tickets_persistence::{Persistence, RegisteredAccount};

use crate::{AuthenticatedActor, CreateRequestForm, RequestRecord, Role, create_request};

pub const STAFF_PHONE: &str = "9000000001";
pub const RESIDENT_PHONE: &str = "7001234567";
pub const PASSWORD: &str = "Secret1";

/// Creates an isolated in-memory database with the cheapest bcrypt cost.
pub fn setup_test_persistence() -> Persistence {
    Persistence::new_in_memory()
        .expect("Failed to create in-memory persistence")
        .with_password_hash_cost(4)
}

pub fn create_test_staff() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from(STAFF_PHONE), Role::Staff)
}

pub fn create_test_resident(phone_number: &str) -> AuthenticatedActor {
    AuthenticatedActor::new(phone_number.to_string(), Role::Resident)
}

/// Registers a staff-only account.
pub fn seed_staff_member(persistence: &mut Persistence, phone_number: &str) -> StaffMember {
    let account: RegisteredAccount = persistence
        .register_account(phone_number, PASSWORD, "Test Staff", false, true)
        .expect("Failed to register staff account");
    account.staff_member.expect("Staff profile missing")
}

/// Registers a resident-only account associated with a new house.
pub fn seed_resident_with_house(
    persistence: &mut Persistence,
    phone_number: &str,
    address: &str,
) -> (Resident, House) {
    let account: RegisteredAccount = persistence
        .register_account(phone_number, PASSWORD, "Test Resident", true, false)
        .expect("Failed to register resident account");
    let resident: Resident = account.resident.expect("Resident profile missing");
    let house: House = persistence
        .register_house(address)
        .expect("Failed to register house");
    persistence
        .add_resident_house(&resident.id, house.id)
        .expect("Failed to associate house");
    (resident, house)
}

/// Files a request as the resident with `phone_number`.
pub fn file_request(
    persistence: &mut Persistence,
    phone_number: &str,
    house_id: i64,
    complaint: &str,
) -> RequestRecord {
    let form: CreateRequestForm = CreateRequestForm {
        house_id: Some(house_id.to_string()),
        request_type: Some(String::from("apartment-internal")),
        complaint: Some(complaint.to_string()),
    };
    create_request(persistence, &form, &create_test_resident(phone_number))
        .expect("Failed to file request")
}
