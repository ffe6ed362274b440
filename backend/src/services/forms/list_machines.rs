//! Lists every machine assignment for the admin panel.

use crate::auth::AdminOnly;
use crate::error::ApiError;
use crate::services::forms::machines;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// `GET /api/admin/machines`.
pub(crate) async fn process(
    state: web::Data<AppState>,
    _admin: AdminOnly,
) -> Result<HttpResponse, ApiError> {
    let assignments = state.db.run(machines::list).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": assignments })))
}
