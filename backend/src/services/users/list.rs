//! The user directory with presence.

use crate::auth::AdminOnly;
use crate::error::ApiError;
use crate::services::users::directory;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// `GET /users`.
pub(crate) async fn process(
    state: web::Data<AppState>,
    _admin: AdminOnly,
) -> Result<HttpResponse, ApiError> {
    let users = state.db.run(|conn| directory::list(conn)).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": users })))
}
