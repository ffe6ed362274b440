//! Loading one checksheet record by id for the form editor.

use crate::auth::policy::scope_department;
use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::services::checksheets::repository;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// `GET /api/load-form/{id}`: one record, or 404 when it does not exist or
/// lies outside a staff caller's department.
///
/// # Returns
/// - `200 OK` with `{success, data}`.
/// - `404 Form not found` otherwise.
pub(crate) async fn process(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let scope = scope_department(&caller, None);

    let record = state
        .db
        .run(move |conn| repository::load_by_id(conn, id, scope.as_deref()))
        .await?
        .ok_or_else(|| ApiError::NotFound("Form not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": record })))
}
