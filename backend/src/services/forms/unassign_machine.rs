//! Removal of a machine assignment.

use crate::audit::Activity;
use crate::auth::AdminOnly;
use crate::error::ApiError;
use crate::services::forms::machines;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::activity::ActionType;
use serde_json::json;

/// `DELETE /api/admin/machines/{id}`. Unknown ids answer success.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    admin: AdminOnly,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let removed = state
        .db
        .run(move |conn| machines::unassign(conn, id))
        .await?;

    if let Some(assignment) = removed {
        state
            .audit
            .record(
                Activity::new(ActionType::DeleteMachine, &req)
                    .by(&admin)
                    .target(id)
                    .details(json!({
                        "info": format!(
                            "Removed {} ({}) from {}",
                            assignment.machine_no, assignment.model, assignment.assigned_form
                        ),
                    })),
            )
            .await;
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Machine assignment deleted successfully",
    })))
}
