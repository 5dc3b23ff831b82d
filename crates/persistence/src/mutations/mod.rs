// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Mutations use Diesel DSL with minimal use of backend-specific helpers
//! (e.g., `last_insert_rowid()` for `SQLite`).
//!
//! ## Module Organization
//!
//! - `credentials` - Login credential creation and removal
//! - `residents` - Residents, houses and resident-house associations
//! - `staff` - Staff members, specializations and organizations
//! - `requests` - Request creation, update and deletion
//! - `sessions` - Session creation and removal
//! - `audit` - Request audit event persistence
//! - `accounts` - Multi-table units of work (registration, user removal)
//!
//! ## Uniqueness
//!
//! Uniqueness and idempotence are delegated to the database: inserts use
//! `ON CONFLICT DO NOTHING` or map constraint violations, and updates and
//! deletes check the affected row count.

pub mod accounts;
pub mod audit;
pub mod credentials;
pub mod requests;
pub mod residents;
pub mod sessions;
pub mod staff;
