// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{Router, http::StatusCode};
use hoa_tickets_persistence::RegisteredAccount;
use serde_json::Value;

use super::helpers::{
    RESIDENT_PHONE, assert_error, json_body, login, seed_account, send, staff_session, test_app,
};
use crate::AppState;

/// Creates a house, a resident living there, and both sessions.
///
/// Returns (`staff_cookie`, `resident_cookie`, `resident_id`).
async fn seed_household(app: &Router, app_state: &AppState) -> (String, String, String) {
    let staff_cookie: String = staff_session(app, app_state).await;

    let response = send(
        app,
        "POST",
        "/staff/api/houses/create",
        Some(&staff_cookie),
        Some("address=Main+St+1"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], 1);

    let account: RegisteredAccount = seed_account(app_state, RESIDENT_PHONE, true, false).await;
    let resident_id: String = account.resident.unwrap().id;

    let uri: String = format!("/staff/api/users/resident/add-house?residentID={resident_id}");
    let response = send(app, "POST", &uri, Some(&staff_cookie), Some("houseID=1")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let resident_cookie: String = login(app, RESIDENT_PHONE).await;
    (staff_cookie, resident_cookie, resident_id)
}

async fn file_request(app: &Router, resident_cookie: &str, complaint: &str) -> Value {
    let form: String = format!("houseID=1&requestType=apartment-internal&complaint={complaint}");
    let response = send(
        app,
        "POST",
        "/resident/api/create-request",
        Some(resident_cookie),
        Some(&form),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test]
async fn test_request_lifecycle() {
    let (app, app_state) = test_app();
    let (staff_cookie, resident_cookie, resident_id) = seed_household(&app, &app_state).await;

    let filed: Value = file_request(&app, &resident_cookie, "Leaking+pipe").await;
    let request_id: String = filed["id"].as_str().unwrap().to_string();
    assert_eq!(filed["status"], "created");
    assert_eq!(filed["complaint"], "Leaking pipe");
    assert_eq!(filed["residentID"], resident_id.as_str());
    assert_eq!(filed["responsibleID"], Value::Null);

    let response = send(
        &app,
        "GET",
        "/staff/api/requests/panel?status=created",
        Some(&staff_cookie),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let panel: Value = json_body(response).await;
    assert_eq!(panel["meta"]["total"], 1);
    assert_eq!(panel["requests"][0]["id"], request_id.as_str());

    let form: String = format!(
        "id={request_id}&residentID={resident_id}&houseID=1&type=apartment-internal\
         &complaint=Leaking+pipe&status=completed&cost=80"
    );
    let response = send(
        &app,
        "POST",
        "/staff/api/requests/panel/update",
        Some(&staff_cookie),
        Some(&form),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = json_body(response).await;
    assert_eq!(updated["message"], "success");
    assert_eq!(updated["status"], "completed");

    let uri: String = format!("/staff/api/requests/panel/history/{request_id}");
    let response = send(&app, "GET", &uri, Some(&staff_cookie), None).await;
    let history: Value = json_body(response).await;
    assert_eq!(history["events"].as_array().unwrap().len(), 2);
    assert_eq!(history["events"][1]["beforeStatus"], "created");
    assert_eq!(history["events"][1]["afterStatus"], "completed");

    let response = send(&app, "GET", "/resident/api/requests", Some(&resident_cookie), None).await;
    let mine: Value = json_body(response).await;
    assert_eq!(mine["requests"][0]["status"], "completed");
    assert_eq!(mine["requests"][0]["cost"], 80.0);

    let uri: String = format!("/staff/api/requests/panel/delete/{request_id}");
    let response = send(&app, "DELETE", &uri, Some(&staff_cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["message"],
        format!("deleted {request_id}")
    );

    let response = send(&app, "DELETE", &uri, Some(&staff_cookie), None).await;
    assert_error(response, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn test_resident_cannot_file_for_foreign_house() {
    let (app, app_state) = test_app();
    let (staff_cookie, resident_cookie, _resident_id) = seed_household(&app, &app_state).await;

    send(
        &app,
        "POST",
        "/staff/api/houses/create",
        Some(&staff_cookie),
        Some("address=Oak+Ave+7"),
    )
    .await;

    let response = send(
        &app,
        "POST",
        "/resident/api/create-request",
        Some(&resident_cookie),
        Some("houseID=2&requestType=common-property&complaint=Broken+gate"),
    )
    .await;
    assert_error(response, StatusCode::FORBIDDEN).await;

    let response = send(&app, "GET", "/staff/api/requests/panel", Some(&staff_cookie), None).await;
    assert_eq!(json_body(response).await["meta"]["total"], 0);
}

#[tokio::test]
async fn test_create_request_validation() {
    let (app, app_state) = test_app();
    let (_staff_cookie, resident_cookie, _resident_id) = seed_household(&app, &app_state).await;

    let response = send(
        &app,
        "POST",
        "/resident/api/create-request",
        Some(&resident_cookie),
        Some("houseID=1&requestType=garden&complaint=Weeds"),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST).await;

    let response = send(
        &app,
        "POST",
        "/resident/api/create-request",
        Some(&resident_cookie),
        Some("houseID=one&requestType=common-property&complaint=Weeds"),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn test_update_rejects_unknown_status() {
    let (app, app_state) = test_app();
    let (staff_cookie, resident_cookie, resident_id) = seed_household(&app, &app_state).await;
    let filed: Value = file_request(&app, &resident_cookie, "Leaking+pipe").await;
    let request_id: &str = filed["id"].as_str().unwrap();

    let form: String = format!(
        "id={request_id}&residentID={resident_id}&houseID=1&type=apartment-internal\
         &complaint=Leaking+pipe&status=resolved"
    );
    let response = send(
        &app,
        "POST",
        "/staff/api/requests/panel/update",
        Some(&staff_cookie),
        Some(&form),
    )
    .await;

    assert_error(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn test_resident_listing_is_paginated() {
    let (app, app_state) = test_app();
    let (_staff_cookie, resident_cookie, _resident_id) = seed_household(&app, &app_state).await;
    for complaint in ["One", "Two", "Three"] {
        file_request(&app, &resident_cookie, complaint).await;
    }

    let response = send(
        &app,
        "GET",
        "/resident/api/requests?page=2&limit=2",
        Some(&resident_cookie),
        None,
    )
    .await;
    let page: Value = json_body(response).await;

    assert_eq!(page["meta"]["total"], 3);
    assert_eq!(page["meta"]["pages"], 2);
    assert_eq!(page["requests"].as_array().unwrap().len(), 1);
}
