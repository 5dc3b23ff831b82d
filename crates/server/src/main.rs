// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod extract;
mod handlers;
mod session;

#[cfg(test)]
mod tests;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use clap::Parser;
use hoa_tickets_api::ApiError;
use hoa_tickets_persistence::Persistence;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinError;
use tracing::{error, info};

use crate::error::HttpError;
use crate::handlers::{
    handle_add_resident_house, handle_add_staff_specialization, handle_create_house,
    handle_create_organization, handle_create_request, handle_create_specialization,
    handle_delete_request, handle_delete_staff_specialization, handle_delete_user,
    handle_filter_requests, handle_find_least_busy, handle_get_request_history,
    handle_get_resident_houses, handle_get_resident_phone, handle_get_staff_specializations,
    handle_get_user_details, handle_list_houses, handle_list_organizations,
    handle_list_resident_requests, handle_list_specializations, handle_list_users, handle_login,
    handle_logout, handle_register_account, handle_remove_resident_house, handle_update_house,
    handle_update_organization, handle_update_request,
};
use crate::session::{require_resident, require_staff, session_gate};

/// HOA Tickets Server - HTTP server for the HOA maintenance ticketing system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, default_value_t = IpAddr::from([127, 0, 0, 1]))]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Upper bound, in seconds, on each storage call
    #[arg(long, default_value_t = 5)]
    query_timeout_secs: u64,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind an async mutex; every storage call
/// holds the lock for its whole unit of work. Password hashing and
/// verification run through [`AppState::run_unlocked`] so bcrypt never
/// holds the lock.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Upper bound on one storage call, including the wait for the lock.
    query_timeout: Duration,
    /// bcrypt cost for new passwords, copied from the persistence layer.
    password_hash_cost: u32,
}

impl AppState {
    fn new(persistence: Persistence, query_timeout: Duration) -> Self {
        let password_hash_cost: u32 = persistence.password_hash_cost();
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            query_timeout,
            password_hash_cost,
        }
    }

    /// Runs a storage operation on the blocking pool under the query
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns the operation's error mapped to HTTP, or 500 if the task
    /// panics or the timeout elapses.
    async fn run_blocking<T, F>(&self, operation: F) -> Result<T, HttpError>
    where
        F: FnOnce(&mut Persistence) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let persistence: Arc<Mutex<Persistence>> = Arc::clone(&self.persistence);
        let work = async move {
            let mut guard: OwnedMutexGuard<Persistence> = persistence.lock_owned().await;
            tokio::task::spawn_blocking(move || operation(&mut guard)).await
        };
        self.bounded(work).await
    }

    /// Runs CPU-bound work that needs no storage on the blocking pool,
    /// without taking the persistence lock.
    ///
    /// # Errors
    ///
    /// Returns the operation's error mapped to HTTP, or 500 if the task
    /// panics or the timeout elapses.
    async fn run_unlocked<T, F>(&self, operation: F) -> Result<T, HttpError>
    where
        F: FnOnce() -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        self.bounded(tokio::task::spawn_blocking(operation)).await
    }

    async fn bounded<T>(
        &self,
        work: impl Future<Output = Result<Result<T, ApiError>, JoinError>>,
    ) -> Result<T, HttpError> {
        match tokio::time::timeout(self.query_timeout, work).await {
            Ok(Ok(result)) => result.map_err(HttpError::from),
            Ok(Err(join_error)) => Err(HttpError::internal(&join_error.to_string())),
            Err(_) => {
                error!(
                    timeout_secs = self.query_timeout.as_secs(),
                    "Blocking operation timed out"
                );
                Err(HttpError::internal("Blocking operation timed out"))
            }
        }
    }
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    let resident_routes: Router<AppState> = Router::new()
        .route("/requests", get(handle_list_resident_requests))
        .route("/create-request", post(handle_create_request))
        .route_layer(middleware::from_fn(require_resident));

    let staff_routes: Router<AppState> = Router::new()
        .route("/register", post(handle_register_account))
        .route("/users/list", get(handle_list_users))
        .route("/users/delete/{phone}", delete(handle_delete_user))
        .route("/users/info/{phone}", get(handle_get_user_details))
        .route("/users/resident/info", get(handle_get_resident_houses))
        .route(
            "/users/resident/remove-house",
            delete(handle_remove_resident_house),
        )
        .route("/users/resident/add-house", post(handle_add_resident_house))
        .route("/users/resident/update-house", post(handle_update_house))
        .route("/users/resident/get-number", get(handle_get_resident_phone))
        .route("/users/staff/info", get(handle_get_staff_specializations))
        .route(
            "/users/staff/delete-spec",
            delete(handle_delete_staff_specialization),
        )
        .route(
            "/users/staff/add-specialization",
            post(handle_add_staff_specialization),
        )
        .route("/organizations/list", get(handle_list_organizations))
        .route("/organizations/create", post(handle_create_organization))
        .route("/organizations/update", post(handle_update_organization))
        .route("/specializations/list", get(handle_list_specializations))
        .route("/specializations/create", post(handle_create_specialization))
        .route("/houses/list", get(handle_list_houses))
        .route("/houses/create", post(handle_create_house))
        .route("/requests/panel", get(handle_filter_requests))
        .route("/requests/panel/update", post(handle_update_request))
        .route(
            "/requests/panel/update/random-assign",
            get(handle_find_least_busy),
        )
        .route("/requests/panel/delete/{id}", delete(handle_delete_request))
        .route(
            "/requests/panel/history/{id}",
            get(handle_get_request_history),
        )
        .route_layer(middleware::from_fn(require_staff));

    Router::new()
        .route("/api/login", post(handle_login))
        .route("/logout", get(handle_logout))
        .nest("/resident/api", resident_routes)
        .nest("/staff/api", staff_routes)
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            session_gate,
        ))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing HOA Tickets Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState =
        AppState::new(persistence, Duration::from_secs(args.query_timeout_secs));
    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener: tokio::net::TcpListener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
