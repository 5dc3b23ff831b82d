// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maintenance request engine tests.

use crate::{Persistence, PersistenceError};
use hoa_tickets_audit::{Action, AuditEvent};
use hoa_tickets_domain::{
    NewRequest, Request, RequestFilter, RequestSort, RequestStatus, RequestType,
    ResidentRequestSort,
};

use super::{
    create_new_request, create_resident_actor, create_staff_actor, create_test_persistence,
    seed_resident_with_house,
};

fn filter_all() -> RequestFilter {
    RequestFilter {
        limit: 100,
        ..RequestFilter::default()
    }
}

#[test]
fn test_create_request_starts_in_created_state() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, house) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");

    let request: Request = persistence
        .create_request(
            &create_new_request(&resident, &house, "Leaking pipe"),
            &create_resident_actor("7001234567"),
        )
        .unwrap();

    assert_eq!(request.status, RequestStatus::Created);
    assert_eq!(request.cost, None);
    assert_eq!(request.responsible_id, None);
    assert_eq!(request.organization_id, None);
    assert_eq!(persistence.get_request_by_id(&request.id).unwrap(), request);
}

#[test]
fn test_create_request_for_unknown_house_fails() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, _) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");
    let new_request: NewRequest = NewRequest {
        resident_id: resident.id,
        house_id: 4242,
        request_type: RequestType::CommonProperty,
        complaint: String::from("Broken gate"),
    };

    let result: Result<Request, PersistenceError> =
        persistence.create_request(&new_request, &create_resident_actor("7001234567"));

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_update_request_rewrites_fields_and_keeps_creation_time() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, house) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");
    let original: Request = persistence
        .create_request(
            &create_new_request(&resident, &house, "Leaking pipe"),
            &create_resident_actor("7001234567"),
        )
        .unwrap();
    let organization = persistence.create_organization("Acme Plumbing").unwrap();

    let mut updated: Request = original.clone();
    updated.status = RequestStatus::Transferred;
    updated.cost = Some(125.5);
    updated.organization_id = Some(organization.id.clone());
    updated.complaint = String::from("Leaking pipe under sink");
    persistence
        .update_request(&updated, &create_staff_actor("7009990000"))
        .unwrap();

    let stored: Request = persistence.get_request_by_id(&original.id).unwrap();
    assert_eq!(stored, updated);
    assert_eq!(stored.created_at, original.created_at);
}

#[test]
fn test_update_unknown_request_fails() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, house) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");
    let mut request: Request = persistence
        .create_request(
            &create_new_request(&resident, &house, "Leaking pipe"),
            &create_resident_actor("7001234567"),
        )
        .unwrap();
    request.id = String::from("does-not-exist");

    let result: Result<(), PersistenceError> =
        persistence.update_request(&request, &create_staff_actor("7009990000"));

    assert!(matches!(result, Err(PersistenceError::RequestNotFound(_))));
}

#[test]
fn test_every_change_is_recorded_in_history() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, house) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");
    let request: Request = persistence
        .create_request(
            &create_new_request(&resident, &house, "Leaking pipe"),
            &create_resident_actor("7001234567"),
        )
        .unwrap();

    let mut completed: Request = request.clone();
    completed.status = RequestStatus::Completed;
    persistence
        .update_request(&completed, &create_staff_actor("7009990000"))
        .unwrap();
    // Staff may reopen a completed request.
    let mut reopened: Request = completed.clone();
    reopened.status = RequestStatus::Created;
    persistence
        .update_request(&reopened, &create_staff_actor("7009990000"))
        .unwrap();

    let history: Vec<AuditEvent> = persistence.get_request_history(&request.id).unwrap();
    assert_eq!(history.len(), 3);

    assert_eq!(history[0].action, Action::CreateRequest);
    assert_eq!(history[0].actor.id, "7001234567");
    assert_eq!(history[0].actor.actor_type, "resident");
    assert_eq!(history[0].change.before, None);
    assert_eq!(history[0].change.after, RequestStatus::Created);

    assert_eq!(history[1].action, Action::UpdateRequest);
    assert_eq!(history[1].change.before, Some(RequestStatus::Created));
    assert_eq!(history[1].change.after, RequestStatus::Completed);

    assert_eq!(history[2].change.before, Some(RequestStatus::Completed));
    assert_eq!(history[2].change.after, RequestStatus::Created);
    assert!(history.iter().all(|e| e.event_id.is_some() && e.recorded_at.is_some()));
}

#[test]
fn test_delete_request_removes_history() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, house) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");
    let request: Request = persistence
        .create_request(
            &create_new_request(&resident, &house, "Leaking pipe"),
            &create_resident_actor("7001234567"),
        )
        .unwrap();

    persistence.delete_request(&request.id).unwrap();

    assert!(persistence.get_request_history(&request.id).unwrap().is_empty());
    assert!(matches!(
        persistence.delete_request(&request.id),
        Err(PersistenceError::RequestNotFound(_))
    ));
}

#[test]
fn test_resident_requests_only_include_own_requests() {
    let mut persistence: Persistence = create_test_persistence();
    let (alice, alice_house) =
        seed_resident_with_house(&mut persistence, "7001000001", "Main St 1");
    let (bob, bob_house) = seed_resident_with_house(&mut persistence, "7001000002", "Elm St 2");

    for complaint in ["Leak", "Draft", "Noise"] {
        persistence
            .create_request(
                &create_new_request(&alice, &alice_house, complaint),
                &create_resident_actor("7001000001"),
            )
            .unwrap();
    }
    persistence
        .create_request(
            &create_new_request(&bob, &bob_house, "Mold"),
            &create_resident_actor("7001000002"),
        )
        .unwrap();

    let (page, total) = persistence
        .list_resident_requests("7001000001", ResidentRequestSort::CreatedDesc, 2, 0)
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 2);
    assert!(page.iter().all(|r| r.resident_id == alice.id));
    assert!(page[0].created_at >= page[1].created_at);

    let (unknown, zero) = persistence
        .list_resident_requests("7009999999", ResidentRequestSort::CreatedDesc, 10, 0)
        .unwrap();
    assert!(unknown.is_empty());
    assert_eq!(zero, 0);
}

#[test]
fn test_resident_requests_sort_by_status() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, house) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");
    let actor = create_resident_actor("7001234567");

    let first: Request = persistence
        .create_request(&create_new_request(&resident, &house, "Leak"), &actor)
        .unwrap();
    persistence
        .create_request(&create_new_request(&resident, &house, "Draft"), &actor)
        .unwrap();
    let mut cancelled: Request = first;
    cancelled.status = RequestStatus::Cancelled;
    persistence
        .update_request(&cancelled, &create_staff_actor("7009990000"))
        .unwrap();

    let (sorted, _) = persistence
        .list_resident_requests("7001234567", ResidentRequestSort::StatusAsc, 10, 0)
        .unwrap();
    assert_eq!(
        sorted.iter().map(|r| r.status).collect::<Vec<RequestStatus>>(),
        vec![RequestStatus::Cancelled, RequestStatus::Created]
    );
}

#[test]
fn test_filter_combines_predicates_with_and() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, house) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");
    let actor = create_resident_actor("7001234567");

    let leak: Request = persistence
        .create_request(&create_new_request(&resident, &house, "Leaking pipe"), &actor)
        .unwrap();
    let mut common: NewRequest = create_new_request(&resident, &house, "Leaking roof");
    common.request_type = RequestType::CommonProperty;
    persistence.create_request(&common, &actor).unwrap();
    persistence
        .create_request(&create_new_request(&resident, &house, "Broken door"), &actor)
        .unwrap();

    let mut filter: RequestFilter = filter_all();
    filter.complaint = Some(String::from("Leaking"));
    let (_, leaking) = persistence.filter_requests(&filter).unwrap();
    assert_eq!(leaking, 2);

    filter.request_type = Some(RequestType::ApartmentInternal);
    let (found, total) = persistence.filter_requests(&filter).unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].id, leak.id);

    let mut by_id: RequestFilter = filter_all();
    by_id.id = Some(leak.id[..8].to_string());
    by_id.house_id = Some(house.id);
    let (found, _) = persistence.filter_requests(&by_id).unwrap();
    assert!(found.iter().any(|r| r.id == leak.id));
}

#[test]
fn test_complaint_filter_matches_wildcards_literally() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, house) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");
    let actor = create_resident_actor("7001234567");

    let discounted: Request = persistence
        .create_request(&create_new_request(&resident, &house, "Heater at 50% power"), &actor)
        .unwrap();
    persistence
        .create_request(&create_new_request(&resident, &house, "Broken door"), &actor)
        .unwrap();

    let mut filter: RequestFilter = filter_all();
    filter.complaint = Some(String::from("%"));
    let (found, total) = persistence.filter_requests(&filter).unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].id, discounted.id);

    filter.complaint = Some(String::from("_"));
    let (_, none) = persistence.filter_requests(&filter).unwrap();
    assert_eq!(none, 0);
}

#[test]
fn test_filter_with_no_matches_returns_empty_page() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, house) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");
    persistence
        .create_request(
            &create_new_request(&resident, &house, "Leaking pipe"),
            &create_resident_actor("7001234567"),
        )
        .unwrap();

    let mut filter: RequestFilter = filter_all();
    filter.status = Some(RequestStatus::Suspended);
    filter.responsible_id = Some(1);

    let (found, total) = persistence.filter_requests(&filter).unwrap();
    assert!(found.is_empty());
    assert_eq!(total, 0);
}

#[test]
fn test_filter_sort_and_pagination() {
    let mut persistence: Persistence = create_test_persistence();
    let (resident, house) = seed_resident_with_house(&mut persistence, "7001234567", "Main St 1");
    let actor = create_resident_actor("7001234567");

    let mut created: Vec<Request> = Vec::new();
    for complaint in ["A", "B", "C", "D", "E"] {
        created.push(
            persistence
                .create_request(&create_new_request(&resident, &house, complaint), &actor)
                .unwrap(),
        );
    }
    let mut assigned: Request = created[2].clone();
    assigned.status = RequestStatus::Assigned;
    persistence
        .update_request(&assigned, &create_staff_actor("7009990000"))
        .unwrap();

    let mut filter: RequestFilter = filter_all();
    filter.sort = RequestSort::StatusDesc;
    filter.limit = 2;
    filter.offset = 0;
    let (page_one, total) = persistence.filter_requests(&filter).unwrap();
    assert_eq!(total, 5);
    assert_eq!(page_one.len(), 2);
    assert_eq!(page_one[0].status, RequestStatus::Created);

    filter.sort = RequestSort::StatusAsc;
    let (ascending, _) = persistence.filter_requests(&filter).unwrap();
    assert_eq!(ascending[0].id, assigned.id);

    filter.offset = 4;
    let (last_page, _) = persistence.filter_requests(&filter).unwrap();
    assert_eq!(last_page.len(), 1);

    filter.sort = RequestSort::CreatedAsc;
    filter.offset = 0;
    filter.limit = 5;
    let (chronological, _) = persistence.filter_requests(&filter).unwrap();
    assert!(
        chronological
            .windows(2)
            .all(|pair| pair[0].created_at <= pair[1].created_at)
    );
}
