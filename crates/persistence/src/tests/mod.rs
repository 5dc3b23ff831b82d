// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod account_tests;
mod request_tests;
mod resident_tests;
mod session_tests;

use hoa_tickets_audit::Actor;
use hoa_tickets_domain::{House, NewRequest, RequestType, Resident};

use crate::Persistence;

/// Creates an isolated in-memory database with the cheapest bcrypt cost.
pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory()
        .expect("in-memory database")
        .with_password_hash_cost(4)
}

pub fn create_resident_actor(phone_number: &str) -> Actor {
    Actor::new(phone_number.to_string(), String::from("resident"))
}

pub fn create_staff_actor(phone_number: &str) -> Actor {
    Actor::new(phone_number.to_string(), String::from("staff"))
}

/// Registers a resident and associates them with a new house.
pub fn seed_resident_with_house(
    persistence: &mut Persistence,
    phone_number: &str,
    address: &str,
) -> (Resident, House) {
    let resident: Resident = persistence
        .register_resident(phone_number, "Test Resident")
        .unwrap();
    let house: House = persistence.register_house(address).unwrap();
    persistence
        .add_resident_house(&resident.id, house.id)
        .unwrap();
    (resident, house)
}

pub fn create_new_request(resident: &Resident, house: &House, complaint: &str) -> NewRequest {
    NewRequest {
        resident_id: resident.id.clone(),
        house_id: house.id,
        request_type: RequestType::ApartmentInternal,
        complaint: complaint.to_string(),
    }
}
