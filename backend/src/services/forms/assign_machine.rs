//! # Machine Assignment
//!
//! Binds a machine number and model to a template folder so that the
//! catalog lists a machine-specific entry for it.

use crate::audit::Activity;
use crate::auth::AdminOnly;
use crate::error::ApiError;
use crate::services::forms::catalog::TemplateId;
use crate::services::forms::machines;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::activity::ActionType;
use common::requests::{non_empty, NewMachineAssignment};
use serde_json::json;

/// `POST /api/admin/machines`: binds a machine to an existing template.
///
/// The template id is validated at write time and its folder must exist;
/// the folder check runs on the blocking pool with the insert.
///
/// # Arguments
///
/// * `admin` - The admin-level caller, recorded as the actor.
/// * `payload` - `machine_no`, `model`, `assigned_form` and an optional
///   `department` (stored as `ASSEMBLY` when omitted).
///
/// # Returns
///
/// The stored `MachineAssignment`, or 400 for a bad or unknown template.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    admin: AdminOnly,
    payload: web::Json<NewMachineAssignment>,
) -> Result<HttpResponse, ApiError> {
    let new = payload.into_inner();
    if new.machine_no.trim().is_empty() || new.model.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    }
    let template = TemplateId::parse(&new.assigned_form)?;
    let department = non_empty(&new.department).map(str::to_string);
    let forms_catalog = state.catalog.clone();

    let assignment = state
        .db
        .run(move |conn| {
            if !forms_catalog.template_exists(&template) {
                return Err(ApiError::BadRequest(format!(
                    "Template '{}' does not exist",
                    template.as_str()
                )));
            }
            machines::assign(
                conn,
                &new.machine_no,
                &new.model,
                &template,
                department.as_deref(),
            )
        })
        .await?;

    state
        .audit
        .record(
            Activity::new(ActionType::CreateMachine, &req)
                .by(&admin)
                .target(assignment.id)
                .details(json!({
                    "machine_no": assignment.machine_no,
                    "model": assignment.model,
                    "assigned_form": assignment.assigned_form,
                    "department": assignment.department,
                })),
        )
        .await;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Machine assigned successfully",
        "data": assignment,
    })))
}
