// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maintenance request queries.
//!
//! Listings are built as boxed Diesel queries so that sparse filters and
//! sort orders can be applied conditionally. The same filtered query is
//! used for the total count and the page of rows.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use hoa_tickets_domain::{Request, RequestFilter, RequestSort, ResidentRequestSort};

use crate::diesel_schema::{requests, residents};
use crate::error::PersistenceError;
use crate::queries::{LIKE_ESCAPE, like_pattern};
use crate::timestamps::parse_timestamp;

/// Diesel Queryable struct for request rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = requests)]
pub(crate) struct RequestRow {
    request_id: String,
    resident_id: String,
    house_id: i64,
    request_type: String,
    complaint: String,
    cost: Option<f64>,
    status: String,
    responsible_id: Option<i64>,
    organization_id: Option<String>,
    created_at: String,
}

impl RequestRow {
    pub(crate) fn into_request(self) -> Result<Request, PersistenceError> {
        Ok(Request {
            id: self.request_id,
            resident_id: self.resident_id,
            house_id: self.house_id,
            request_type: self.request_type.parse()?,
            complaint: self.complaint,
            cost: self.cost,
            status: self.status.parse()?,
            responsible_id: self.responsible_id,
            organization_id: self.organization_id,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

type BoxedRequests<'a> = requests::BoxedQuery<'a, Sqlite>;

fn into_requests(rows: Vec<RequestRow>) -> Result<Vec<Request>, PersistenceError> {
    rows.into_iter().map(RequestRow::into_request).collect()
}

/// Retrieves a request by ID.
///
/// # Errors
///
/// Returns `RequestNotFound` if the request does not exist.
pub fn get_request_by_id(
    conn: &mut SqliteConnection,
    request_id: &str,
) -> Result<Request, PersistenceError> {
    requests::table
        .filter(requests::request_id.eq(request_id))
        .select(RequestRow::as_select())
        .first::<RequestRow>(conn)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                PersistenceError::RequestNotFound(format!("ID {request_id}"))
            }
            other => PersistenceError::from(other),
        })?
        .into_request()
}

fn residents_requests(phone_number: &str) -> BoxedRequests<'_> {
    requests::table
        .filter(
            requests::resident_id.eq_any(
                residents::table
                    .filter(residents::phone_number.eq(phone_number))
                    .select(residents::resident_id),
            ),
        )
        .into_boxed()
}

/// Lists the requests filed by the resident with the given phone number.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `phone_number` - The resident's phone number
/// * `sort` - Sort order
/// * `limit` - Page size
/// * `offset` - Rows to skip
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_resident_requests(
    conn: &mut SqliteConnection,
    phone_number: &str,
    sort: ResidentRequestSort,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Request>, i64), PersistenceError> {
    let total: i64 = residents_requests(phone_number).count().get_result(conn)?;

    let query: BoxedRequests<'_> = match sort {
        ResidentRequestSort::StatusAsc => residents_requests(phone_number)
            .order(requests::status.asc())
            .then_order_by(requests::created_at.desc()),
        ResidentRequestSort::TypeAsc => residents_requests(phone_number)
            .order(requests::request_type.asc())
            .then_order_by(requests::created_at.desc()),
        ResidentRequestSort::CreatedDesc => {
            residents_requests(phone_number).order(requests::created_at.desc())
        }
    };

    let rows: Vec<RequestRow> = query
        .then_order_by(requests::request_id.asc())
        .select(RequestRow::as_select())
        .limit(limit)
        .offset(offset)
        .load(conn)?;

    Ok((into_requests(rows)?, total))
}

fn filtered_requests(filter: &RequestFilter) -> BoxedRequests<'static> {
    let mut query: BoxedRequests<'static> = requests::table.into_boxed();

    if let Some(id) = &filter.id {
        query = query.filter(
            requests::request_id
                .like(like_pattern(id))
                .escape(LIKE_ESCAPE),
        );
    }
    if let Some(resident_id) = &filter.resident_id {
        query = query.filter(
            requests::resident_id
                .like(like_pattern(resident_id))
                .escape(LIKE_ESCAPE),
        );
    }
    if let Some(organization_id) = &filter.organization_id {
        query = query.filter(
            requests::organization_id
                .like(like_pattern(organization_id))
                .escape(LIKE_ESCAPE),
        );
    }
    if let Some(complaint) = &filter.complaint {
        query = query.filter(
            requests::complaint
                .like(like_pattern(complaint))
                .escape(LIKE_ESCAPE),
        );
    }
    if let Some(request_type) = filter.request_type {
        query = query.filter(requests::request_type.eq(request_type.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(requests::status.eq(status.as_str()));
    }
    if let Some(house_id) = filter.house_id {
        query = query.filter(requests::house_id.eq(house_id));
    }
    if let Some(responsible_id) = filter.responsible_id {
        query = query.filter(requests::responsible_id.eq(responsible_id));
    }

    query
}

/// Lists requests matching every predicate in `filter`.
///
/// Substring predicates (ID, resident ID, organization ID, complaint) and
/// exact predicates (type, status, house, responsible staff member) are
/// combined with AND. No matches yields an empty page with total 0.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn filter_requests(
    conn: &mut SqliteConnection,
    filter: &RequestFilter,
) -> Result<(Vec<Request>, i64), PersistenceError> {
    let total: i64 = filtered_requests(filter).count().get_result(conn)?;

    let query: BoxedRequests<'static> = match filter.sort {
        RequestSort::StatusAsc => filtered_requests(filter)
            .order(requests::status.asc())
            .then_order_by(requests::created_at.desc()),
        RequestSort::StatusDesc => filtered_requests(filter)
            .order(requests::status.desc())
            .then_order_by(requests::created_at.desc()),
        RequestSort::TypeAsc => filtered_requests(filter)
            .order(requests::request_type.asc())
            .then_order_by(requests::created_at.desc()),
        RequestSort::TypeDesc => filtered_requests(filter)
            .order(requests::request_type.desc())
            .then_order_by(requests::created_at.desc()),
        RequestSort::CreatedAsc => filtered_requests(filter).order(requests::created_at.asc()),
        RequestSort::CreatedDesc => filtered_requests(filter).order(requests::created_at.desc()),
    };

    let rows: Vec<RequestRow> = query
        .then_order_by(requests::request_id.asc())
        .select(RequestRow::as_select())
        .limit(filter.limit)
        .offset(filter.offset)
        .load(conn)?;

    Ok((into_requests(rows)?, total))
}
