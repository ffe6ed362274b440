//! Admin edits of a record's name and payload.

use crate::audit::Activity;
use crate::auth::AdminOnly;
use crate::error::ApiError;
use crate::services::checksheets::repository;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::activity::ActionType;
use common::requests::UpdateChecksheetRequest;
use serde_json::json;

/// `PUT /update/{id}`: replaces the name and payload of a record.
///
/// An id that matches nothing still answers success.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    admin: AdminOnly,
    id: web::Path<i64>,
    payload: web::Json<UpdateChecksheetRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let body = payload.into_inner();
    let name = body.checksheet_name.clone();

    let changed = state
        .db
        .run(move |conn| {
            repository::update(
                conn,
                id,
                body.checksheet_name.as_deref(),
                body.checksheet_data.as_ref(),
            )
        })
        .await?;

    if changed > 0 {
        state
            .audit
            .record(
                Activity::new(ActionType::UpdateChecksheet, &req)
                    .by(&admin)
                    .target(id)
                    .details(json!({ "checksheet_name": name })),
            )
            .await;
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Data updated successfully",
    })))
}
