// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session cookie handling and role gates.
//!
//! The session gate runs on every request. It resolves the session cookie
//! into a [`RequestContext`] and never fails the request. The role gates
//! run on the resident and staff route groups: they answer 401 when no
//! identity was resolved, 403 when the role is not allowed, and otherwise
//! hand the [`AuthenticatedActor`] to the handler as an extension.

use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderName, HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::Response,
};
use hoa_tickets_api::{
    ApiError, AuthenticatedActor, AuthenticationService, AuthorizationService, Role,
};
use tracing::debug;

use crate::AppState;
use crate::error::HttpError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "hoa_session";

/// Identity resolved from the session cookie, if any.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// The raw session token from the cookie.
    pub session_token: Option<String>,
    /// The caller, when the token names a live session.
    pub actor: Option<AuthenticatedActor>,
}

/// Resolves the session cookie into a [`RequestContext`] extension.
///
/// Unknown, expired and unreadable sessions leave the context anonymous.
pub async fn session_gate(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session_token: Option<String> = session_token(request.headers());

    let actor: Option<AuthenticatedActor> = match session_token.clone() {
        Some(token) => app_state
            .run_blocking(move |persistence| {
                AuthenticationService::validate_session(persistence, &token)
                    .map_err(ApiError::from)
            })
            .await
            .inspect_err(|e| debug!(reason = %e.message, "Session not resolved"))
            .ok(),
        None => None,
    };

    request.extensions_mut().insert(RequestContext {
        session_token,
        actor,
    });
    next.run(request).await
}

/// Admits residents and staff.
///
/// # Errors
///
/// Returns 401 without a session and 403 for other roles.
pub async fn require_resident(request: Request, next: Next) -> Result<Response, HttpError> {
    require_roles(request, next, &[Role::Resident, Role::Staff]).await
}

/// Admits staff only.
///
/// # Errors
///
/// Returns 401 without a session and 403 for residents.
pub async fn require_staff(request: Request, next: Next) -> Result<Response, HttpError> {
    require_roles(request, next, &[Role::Staff]).await
}

async fn require_roles(
    mut request: Request,
    next: Next,
    allowed: &[Role],
) -> Result<Response, HttpError> {
    let actor: AuthenticatedActor = request
        .extensions()
        .get::<RequestContext>()
        .and_then(|context| context.actor.clone())
        .ok_or_else(HttpError::unauthenticated)?;

    let action: String = request.uri().path().to_string();
    AuthorizationService::require_role(&actor, &action, allowed).map_err(ApiError::from)?;

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

/// Reads the session token from the `Cookie` headers.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Builds the `Set-Cookie` header that stores a new session.
///
/// # Errors
///
/// Returns an error if the token is not a valid header value.
pub fn session_cookie(session_token: &str) -> Result<(HeaderName, HeaderValue), HttpError> {
    let max_age: i64 = AuthenticationService::SESSION_LIFETIME.whole_seconds();
    let cookie: String = format!(
        "{SESSION_COOKIE}={session_token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"
    );
    let value: HeaderValue =
        HeaderValue::from_str(&cookie).map_err(|e| HttpError::internal(&e.to_string()))?;
    Ok((SET_COOKIE, value))
}

/// Builds the `Set-Cookie` header that expires the session cookie.
#[must_use]
pub fn expired_session_cookie() -> (HeaderName, HeaderValue) {
    (
        SET_COOKIE,
        HeaderValue::from_static("hoa_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    )
}
