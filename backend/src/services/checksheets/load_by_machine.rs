//! # Load By Machine Slot
//!
//! The form editor opens a machine's sheet by its slot (department, model,
//! machine, group and sheet name) rather than by id. This module answers
//! with the most recent record for that slot, or `data: null` when the slot
//! has never been filled. Staff-level callers are pinned to their own
//! department whatever the query says.

use crate::auth::policy::scope_department;
use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::services::checksheets::repository;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::MachineSlotQuery;
use serde_json::json;

/// `GET /api/load-form-by-machine`: the latest record for a slot.
///
/// An empty slot is not an error: it answers `data: null`.
pub(crate) async fn process(
    state: web::Data<AppState>,
    caller: Authenticated,
    query: web::Query<MachineSlotQuery>,
) -> Result<HttpResponse, ApiError> {
    let mut slot = query.into_inner();
    let scoped = scope_department(&caller, Some(slot.department.as_str()));
    if let Some(department) = scoped {
        slot.department = department;
    }

    let record = state
        .db
        .run(move |conn| repository::load_by_machine_slot(conn, &slot))
        .await?;

    Ok(HttpResponse::Ok().json(match record {
        Some(record) => json!({ "success": true, "data": record }),
        None => json!({ "success": true, "data": null, "message": "No existing form found" }),
    }))
}
