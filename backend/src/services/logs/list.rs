//! Admin view of the activity log.

use crate::auth::AdminOnly;
use crate::error::ApiError;
use crate::services::logs::history;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::LogQuery;
use serde_json::json;

/// `GET /logs`.
///
/// # Arguments
/// * `query` - Optional `user_code`, `action_type`, `start_date`, `end_date`
///   and `limit` (default 100, at most 1000).
///
/// # Returns
/// `200 OK` with the matching rows under `data`, newest first.
pub(crate) async fn process(
    state: web::Data<AppState>,
    _admin: AdminOnly,
    query: web::Query<LogQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = query.into_inner();
    let rows = state
        .db
        .run(move |conn| history::query(conn, &filter))
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": rows })))
}
