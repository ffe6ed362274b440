//! Rewrites an account, optionally with a new password.

use crate::audit::Activity;
use crate::auth::AdminOnly;
use crate::error::ApiError;
use crate::services::users::{directory, required_fields};
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::activity::ActionType;
use common::requests::{non_empty, UpdateUserRequest};
use serde_json::json;

/// `PUT /users/{id}`: an empty or missing password keeps the stored hash.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    admin: AdminOnly,
    id: web::Path<i64>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let body = payload.into_inner();
    let fields = required_fields(&body.code, &body.username, body.role, &body.department)?;
    let password = non_empty(&body.password).map(str::to_string);

    let cost = state.bcrypt_cost;
    let details = json!({
        "code": fields.code,
        "username": fields.username,
        "role": fields.role,
        "department": fields.department,
        "password_updated": password.is_some(),
    });
    let changed = state
        .db
        .run(move |conn| directory::update(conn, id, &fields, password.as_deref(), cost))
        .await?;

    if changed > 0 {
        state
            .audit
            .record(
                Activity::new(ActionType::UpdateUser, &req)
                    .by(&admin)
                    .target(id)
                    .details(details),
            )
            .await;
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User updated successfully",
    })))
}
