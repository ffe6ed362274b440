//! # Checksheet Search
//!
//! Filtered summaries for the search screen. Each filter is an exact match;
//! blank filters are ignored. The `department` filter is only honoured for
//! admin-level callers, staff always search their own department.

use crate::auth::policy::scope_department;
use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::services::checksheets::repository;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::{non_empty, ChecksheetFilters};

/// `GET /search`: summaries matching every given filter, newest first.
///
/// # Arguments
/// * `caller` - The signed-in identity; decides the department scope.
/// * `query` - Optional `department`, `model`, `machine_no`, `as_group` and
///   `checksheet_name` filters.
///
/// # Returns
/// - `200 OK` with a JSON array of `ChecksheetSummary`, possibly empty.
/// - `401` without a valid session, `500` when storage fails.
pub(crate) async fn process(
    state: web::Data<AppState>,
    caller: Authenticated,
    query: web::Query<ChecksheetFilters>,
) -> Result<HttpResponse, ApiError> {
    let filters = query.into_inner();
    let scope = scope_department(&caller, non_empty(&filters.department));

    let rows = state
        .db
        .run(move |conn| repository::search(conn, &filters, scope.as_deref()))
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}
