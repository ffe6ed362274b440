//! # Form Save Service
//!
//! Backs `POST /api/save-form`, the endpoint the form editor calls on save.
//!
//! ## Workflow
//!
//! 1.  **Validation**: the four slot fields must be non-blank.
//! 2.  **Scoping**: a staff-level caller's department replaces whatever the
//!     body says, and updates by id only match records already in that
//!     department. Admin-level callers are not confined.
//! 3.  **Upsert**: with an `id` the record is rewritten, otherwise a new one
//!     is inserted. The content hash is recomputed from the payload each time.
//! 4.  **Audit**: `UPDATE_CHECKSHEET` for an update, `CREATE_CHECKSHEET_DATA`
//!     for an insert, written after the record commits.

use crate::audit::Activity;
use crate::auth::policy::scope_department;
use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::services::checksheets::repository::{self, FormFields};
use crate::services::checksheets::require_fields;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::activity::ActionType;
use common::requests::SaveFormRequest;
use serde_json::json;

/// `POST /api/save-form`: stores a filled form.
///
/// # Arguments
/// * `caller` - The signed-in identity, recorded as the actor.
/// * `payload` - The slot fields, optional `id`, `checksheet_name`,
///   `checksheet_data` and `status`.
///
/// # Returns
/// - `200 OK` with the stored record under `data`.
/// - `400` when a slot field is blank.
/// - `404` when `id` names no record the caller may write.
///
/// With an `id` the record is updated, otherwise a new one is inserted; the
/// content hash is recomputed in both cases. Staff-level callers write into
/// their own department and can only update records already in it.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    caller: Authenticated,
    payload: web::Json<SaveFormRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = payload.into_inner();
    require_fields(&[
        ("department", body.department.as_str()),
        ("model", body.model.as_str()),
        ("machine_no", body.machine_no.as_str()),
        ("as_group", body.as_group.as_str()),
    ])?;

    let scope = scope_department(&caller, Some(body.department.as_str()));
    let fields = FormFields {
        department: scope.clone().unwrap_or(body.department),
        model: body.model,
        machine_no: body.machine_no,
        as_group: body.as_group,
        checksheet_name: body.checksheet_name,
        checksheet_data: body.checksheet_data,
        status: body.status,
    };
    let id = body.id;
    // Updates are confined to the caller's department; admins are unconfined.
    let update_scope = if caller.role.is_admin_level() { None } else { scope };

    let details = json!({
        "department": fields.department,
        "model": fields.model,
        "machine_no": fields.machine_no,
        "checksheet_name": fields.checksheet_name,
    });

    let record = state
        .db
        .run(move |conn| repository::upsert_form_save(conn, id, &fields, update_scope.as_deref()))
        .await?
        .ok_or_else(|| ApiError::NotFound("Form not found".into()))?;

    let (action, message) = if id.is_some() {
        (ActionType::UpdateChecksheet, "Form updated successfully")
    } else {
        (ActionType::CreateChecksheetData, "Form saved successfully")
    };
    state
        .audit
        .record(
            Activity::new(action, &req)
                .by(&caller)
                .target(record.id)
                .details(details),
        )
        .await;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "data": record,
    })))
}
