// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resident and house registry tests.

use crate::{Persistence, PersistenceError};
use hoa_tickets_domain::{House, Resident};

use super::{create_test_persistence, seed_resident_with_house};

#[test]
fn test_register_resident_generates_opaque_id() {
    let mut persistence: Persistence = create_test_persistence();

    let resident: Resident = persistence
        .register_resident("7001234567", "Jane Doe")
        .unwrap();

    assert_eq!(resident.id.len(), 40);
    assert!(resident.id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(persistence.get_resident_by_id(&resident.id).unwrap(), resident);
    assert_eq!(
        persistence.get_resident_by_phone("7001234567").unwrap(),
        resident
    );
}

#[test]
fn test_register_resident_twice_for_same_phone_conflicts() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .register_resident("7001234567", "Jane Doe")
        .unwrap();

    let result: Result<Resident, PersistenceError> =
        persistence.register_resident("7001234567", "Jane Again");

    assert!(matches!(result, Err(PersistenceError::AlreadyExists(_))));
}

#[test]
fn test_unknown_resident_lookups_fail() {
    let mut persistence: Persistence = create_test_persistence();

    assert!(matches!(
        persistence.get_resident_by_phone("7000000000"),
        Err(PersistenceError::ResidentNotFound(_))
    ));
    assert!(matches!(
        persistence.get_resident_by_id("nope"),
        Err(PersistenceError::ResidentNotFound(_))
    ));
}

#[test]
fn test_register_house_rejects_duplicate_address() {
    let mut persistence: Persistence = create_test_persistence();
    let house: House = persistence.register_house("Main St 1").unwrap();
    assert_eq!(house.address, "Main St 1");

    let result: Result<House, PersistenceError> = persistence.register_house("Main St 1");
    assert!(matches!(result, Err(PersistenceError::AlreadyExists(_))));
}

#[test]
fn test_association_insert_is_idempotent() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, house) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");

    persistence.add_resident_house(&resident.id, house.id).unwrap();

    let houses: Vec<House> = persistence.find_resident_houses(&resident.id).unwrap();
    assert_eq!(houses, vec![house]);
}

#[test]
fn test_association_requires_existing_resident_and_house() {
    let mut persistence: Persistence = create_test_persistence();
    let resident: Resident = persistence
        .register_resident("7001234567", "Jane Doe")
        .unwrap();
    let house: House = persistence.register_house("Main St 1").unwrap();

    assert!(matches!(
        persistence.add_resident_house("missing", house.id),
        Err(PersistenceError::ResidentNotFound(_))
    ));
    assert_eq!(
        persistence.add_resident_house(&resident.id, house.id + 100),
        Err(PersistenceError::HouseNotFound(house.id + 100))
    );
}

#[test]
fn test_validate_resident_house_reflects_association() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, house) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");
    let other: House = persistence.register_house("Elm St 2").unwrap();

    assert!(persistence.validate_resident_house(&resident.id, house.id).unwrap());
    assert!(!persistence.validate_resident_house(&resident.id, other.id).unwrap());

    persistence.delete_resident_house(&resident.id, house.id).unwrap();
    assert!(!persistence.validate_resident_house(&resident.id, house.id).unwrap());
}

#[test]
fn test_delete_missing_association_fails() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, _) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");

    let result: Result<(), PersistenceError> = persistence.delete_resident_house(&resident.id, 999);

    assert!(matches!(
        result,
        Err(PersistenceError::AssociationNotFound { house_id: 999, .. })
    ));
}

#[test]
fn test_list_houses_matches_address_substring() {
    let mut persistence: Persistence = create_test_persistence();
    for address in ["Main St 1", "Main St 2", "Elm St 3"] {
        persistence.register_house(address).unwrap();
    }

    let (houses, total) = persistence.list_houses("Main", 1, 1).unwrap();
    assert_eq!(total, 2);
    assert_eq!(houses.len(), 1);
    assert_eq!(houses[0].address, "Main St 2");

    let (none, zero) = persistence.list_houses("Oak", 10, 0).unwrap();
    assert!(none.is_empty());
    assert_eq!(zero, 0);
}

#[test]
fn test_list_houses_treats_wildcards_literally() {
    let mut persistence: Persistence = create_test_persistence();
    for address in ["Main St 1", "Oak Ave 2", "Elm_Road", "100% Lane"] {
        persistence.register_house(address).unwrap();
    }

    let (underscored, total) = persistence.list_houses("_", 10, 0).unwrap();
    assert_eq!(total, 1);
    assert_eq!(underscored[0].address, "Elm_Road");

    let (percent, total) = persistence.list_houses("%", 10, 0).unwrap();
    assert_eq!(total, 1);
    assert_eq!(percent[0].address, "100% Lane");

    let (none, zero) = persistence.list_houses("\\", 10, 0).unwrap();
    assert!(none.is_empty());
    assert_eq!(zero, 0);
}

#[test]
fn test_update_house_address() {
    let mut persistence: Persistence = create_test_persistence();
    let house: House = persistence.register_house("Main St 1").unwrap();
    persistence.register_house("Elm St 2").unwrap();

    persistence.update_house_address(house.id, "Main St 10").unwrap();
    assert_eq!(
        persistence.get_house_by_id(house.id).unwrap().address,
        "Main St 10"
    );

    assert_eq!(
        persistence.update_house_address(9999, "Nowhere"),
        Err(PersistenceError::HouseNotFound(9999))
    );
    assert!(matches!(
        persistence.update_house_address(house.id, "Elm St 2"),
        Err(PersistenceError::AlreadyExists(_))
    ));
}

#[test]
fn test_delete_resident_by_phone_removes_associations() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, house) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");

    persistence.delete_resident_by_phone("7001234567").unwrap();

    assert!(!persistence.validate_resident_house(&resident.id, house.id).unwrap());
    assert!(matches!(
        persistence.delete_resident_by_phone("7001234567"),
        Err(PersistenceError::ResidentNotFound(_))
    ));
}
