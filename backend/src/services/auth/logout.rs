//! Ends a browser session by expiring the `token` cookie.

use crate::audit::Activity;
use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::services::auth::expired_session_cookie;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::activity::ActionType;
use serde_json::json;

/// `POST /auth/logout`. Only the cookie is cleared; the token itself stays
/// valid until it expires.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    caller: Authenticated,
) -> Result<HttpResponse, ApiError> {
    state
        .audit
        .record(Activity::new(ActionType::Logout, &req).by(&caller))
        .await;

    Ok(HttpResponse::Ok()
        .cookie(expired_session_cookie())
        .json(json!({ "success": true, "message": "Logged out" })))
}
