//! Template folders as the admin panel shows them.

use crate::auth::AdminOnly;
use crate::error::ApiError;
use crate::services::forms::catalog::Template;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::form::TemplateListing;
use serde_json::json;

/// `GET /api/admin/templates`: every template folder with its raw metadata.
pub(crate) async fn process(
    state: web::Data<AppState>,
    _admin: AdminOnly,
) -> Result<HttpResponse, ApiError> {
    let catalog = state.catalog.clone();
    let templates: Vec<TemplateListing> = tokio::task::spawn_blocking(move || {
        catalog
            .templates()
            .map(|templates| templates.iter().map(Template::listing).collect::<Vec<_>>())
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Task join error: {}", e)))??;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": templates.len(),
        "templates": templates,
    })))
}
