//! Unfiltered dump of the checksheet table for admins.

use crate::auth::AdminOnly;
use crate::error::ApiError;
use crate::services::checksheets::repository;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// `GET /db`: every record with its payload.
pub(crate) async fn process(
    state: web::Data<AppState>,
    _admin: AdminOnly,
) -> Result<HttpResponse, ApiError> {
    let records = state.db.run(repository::list_all).await?;
    Ok(HttpResponse::Ok().json(records))
}
