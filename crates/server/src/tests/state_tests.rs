// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Blocking-pool behaviour of `AppState`.

use std::time::Duration;

use axum::http::StatusCode;
use hoa_tickets_api::{
    AccountRegistration, AuthenticatedActor, HashedRegistration, RegisterAccountRequest, Role,
    validate_registration,
};
use hoa_tickets_persistence::Persistence;

use super::helpers::{PASSWORD, RESIDENT_PHONE, STAFF_PHONE};
use crate::AppState;
use crate::error::HttpError;

fn short_timeout_state() -> AppState {
    let persistence: Persistence = Persistence::new_in_memory()
        .unwrap()
        .with_password_hash_cost(4);
    AppState::new(persistence, Duration::from_millis(200))
}

#[tokio::test]
async fn test_hash_cost_is_copied_from_persistence() {
    let app_state: AppState = short_timeout_state();

    assert_eq!(app_state.password_hash_cost, 4);
}

#[tokio::test]
async fn test_unlocked_work_runs_while_storage_is_locked() {
    let app_state: AppState = short_timeout_state();
    let _guard = app_state.persistence.lock().await;

    let value: u32 = app_state.run_unlocked(|| Ok(7)).await.unwrap();

    assert_eq!(value, 7);
}

#[tokio::test]
async fn test_password_hashing_does_not_wait_for_storage() {
    let app_state: AppState = short_timeout_state();
    let staff: AuthenticatedActor = AuthenticatedActor::new(String::from(STAFF_PHONE), Role::Staff);
    let form: RegisterAccountRequest = RegisterAccountRequest {
        phone_number: Some(String::from(RESIDENT_PHONE)),
        password: Some(String::from(PASSWORD)),
        full_name: Some(String::from("Jane Doe")),
        is_resident: Some(String::from("on")),
        is_staff_member: None,
    };
    let registration: AccountRegistration = validate_registration(&form, &staff).unwrap();
    let cost: u32 = app_state.password_hash_cost;

    let guard = app_state.persistence.lock().await;
    let hashed: Result<HashedRegistration, HttpError> = app_state
        .run_unlocked(move || registration.hash_password(cost))
        .await;
    drop(guard);

    assert!(hashed.is_ok());
}

#[tokio::test]
async fn test_storage_call_times_out_behind_a_held_lock() {
    let app_state: AppState = short_timeout_state();
    let _guard = app_state.persistence.lock().await;

    let result: Result<bool, HttpError> = app_state
        .run_blocking(|persistence| {
            persistence
                .credential_exists(RESIDENT_PHONE)
                .map_err(hoa_tickets_api::translate_persistence_error)
        })
        .await;

    let error: HttpError = result.unwrap_err();
    assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error.message, "Internal server error");
}
