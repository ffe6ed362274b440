//! Creation of empty checksheet records by admins.

use crate::audit::Activity;
use crate::auth::AdminOnly;
use crate::error::ApiError;
use crate::services::checksheets::{repository, require_fields};
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::activity::ActionType;
use common::requests::NewChecksheetRequest;
use serde_json::json;

/// `POST /new`: creates an empty record for a machine slot.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    admin: AdminOnly,
    payload: web::Json<NewChecksheetRequest>,
) -> Result<HttpResponse, ApiError> {
    let new = payload.into_inner();
    require_fields(&[
        ("department", new.department.as_str()),
        ("model", new.model.as_str()),
        ("as_group", new.as_group.as_str()),
        ("machine_no", new.machine_no.as_str()),
    ])?;

    let details = json!({
        "department": new.department,
        "model": new.model,
        "machine_no": new.machine_no,
        "checksheet_name": new.checksheet_name,
    });

    let record = state
        .db
        .run(move |conn| {
            repository::create(
                conn,
                &new.department,
                &new.model,
                &new.as_group,
                &new.machine_no,
                new.checksheet_name.as_deref().filter(|n| !n.is_empty()),
            )
        })
        .await?;

    state
        .audit
        .record(
            Activity::new(ActionType::CreateChecksheet, &req)
                .by(&admin)
                .target(record.id)
                .details(details),
        )
        .await;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Data created successfully",
        "data": record,
    })))
}
