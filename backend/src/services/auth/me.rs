//! Echoes the identity carried by the session cookie.

use crate::auth::Authenticated;
use crate::error::ApiError;
use actix_web::HttpResponse;
use serde_json::json;

/// `GET /auth/me`.
pub(crate) async fn process(caller: Authenticated) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(json!({ "success": true, "user": caller.0 })))
}
