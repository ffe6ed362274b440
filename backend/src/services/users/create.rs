//! Account creation by admin-level callers.

use crate::audit::Activity;
use crate::auth::AdminOnly;
use crate::error::ApiError;
use crate::services::users::{directory, required_fields};
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::activity::ActionType;
use common::requests::{non_empty, CreateUserRequest};
use serde_json::json;

/// `POST /users`.
///
/// # Returns
/// - `200 OK` with the new account under `data`.
/// - `400` for a missing field or a code that is already taken.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    admin: AdminOnly,
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = payload.into_inner();
    let fields = required_fields(&body.code, &body.username, body.role, &body.department)?;
    let password = non_empty(&body.password)
        .ok_or_else(|| ApiError::BadRequest("Missing required fields".into()))?
        .to_string();

    let cost = state.bcrypt_cost;
    let details = json!({
        "code": fields.code,
        "username": fields.username,
        "role": fields.role,
        "department": fields.department,
    });
    let user = state
        .db
        .run(move |conn| directory::create(conn, &fields, &password, cost))
        .await?;

    state
        .audit
        .record(
            Activity::new(ActionType::CreateUser, &req)
                .by(&admin)
                .target(user.id)
                .details(details),
        )
        .await;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User created successfully",
        "data": user,
    })))
}
