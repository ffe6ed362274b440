//! Removal of a checksheet record.

use crate::audit::Activity;
use crate::auth::AdminOnly;
use crate::error::ApiError;
use crate::services::checksheets::repository;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::activity::ActionType;
use serde_json::json;

/// `DELETE /api/delete-form/{id}`.
///
/// Deleting an id that does not exist answers the same success as a real
/// delete; only real deletes are written to the activity log.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    admin: AdminOnly,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let removed = state
        .db
        .run(move |conn| repository::delete(conn, id))
        .await?;

    if let Some(item) = removed {
        state
            .audit
            .record(
                Activity::new(ActionType::DeleteChecksheet, &req)
                    .by(&admin)
                    .target(id)
                    .details(json!({
                        "info": format!(
                            "Deleted checksheet: {}",
                            item.checksheet_name.as_deref().unwrap_or("")
                        ),
                        "metadata": {
                            "department": item.department,
                            "model": item.model,
                            "machine_no": item.machine_no,
                            "checksheet_name": item.checksheet_name,
                        },
                    })),
            )
            .await;
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Form deleted successfully",
    })))
}
