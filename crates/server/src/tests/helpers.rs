// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use hoa_tickets_persistence::{Persistence, RegisteredAccount};
use serde_json::Value;
use tower::ServiceExt;

use crate::session::SESSION_COOKIE;
use crate::{AppState, build_router};

pub const STAFF_PHONE: &str = "9000000001";
pub const RESIDENT_PHONE: &str = "7001234567";
pub const PASSWORD: &str = "Secret1";

/// A router over fresh in-memory storage, plus the state behind it.
pub fn test_app() -> (Router, AppState) {
    let persistence: Persistence = Persistence::new_in_memory()
        .expect("Failed to create in-memory persistence")
        .with_password_hash_cost(4);
    let app_state: AppState = AppState::new(persistence, Duration::from_secs(5));
    (build_router(app_state.clone()), app_state)
}

/// Registers an account directly in storage.
pub async fn seed_account(
    app_state: &AppState,
    phone_number: &str,
    as_resident: bool,
    as_staff: bool,
) -> RegisteredAccount {
    let mut persistence = app_state.persistence.lock().await;
    persistence
        .register_account(
            phone_number,
            PASSWORD,
            "Test User",
            as_resident,
            as_staff,
        )
        .expect("Failed to seed account")
}

/// Sends one request through the router.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    form: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body: Body = match form {
        Some(form) => {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

/// Decodes a JSON response body.
pub async fn json_body(response: Response<Body>) -> Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

/// Logs in and returns the `Cookie` header value for the new session.
pub async fn login(app: &Router, phone_number: &str) -> String {
    let form: String = format!("phoneNumber={phone_number}&password={PASSWORD}");
    let response = send(app, "POST", "/api/login", None, Some(&form)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie: &str = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Login did not set a cookie")
        .to_str()
        .unwrap();
    let pair: &str = set_cookie.split(';').next().unwrap();
    assert!(pair.starts_with(SESSION_COOKIE));
    pair.to_string()
}

/// Seeds a staff account and logs it in.
pub async fn staff_session(app: &Router, app_state: &AppState) -> String {
    seed_account(app_state, STAFF_PHONE, false, true).await;
    login(app, STAFF_PHONE).await
}

/// Asserts the standard error body and returns its message.
pub async fn assert_error(response: Response<Body>, status: StatusCode) -> String {
    assert_eq!(response.status(), status);
    let body: Value = json_body(response).await;
    assert_eq!(body["error"], true);
    body["message"].as_str().unwrap().to_string()
}
