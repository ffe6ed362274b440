//! # Initial Admin Registration
//!
//! Lets a fresh installation create its first admin account without any
//! session. Once an `admin` row exists the endpoint answers 403 for good;
//! later accounts are created through `POST /users`.

use crate::audit::Activity;
use crate::error::ApiError;
use crate::services::users::directory::{self, UserFields};
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::activity::ActionType;
use common::model::role::Role;
use common::requests::RegisterAdminRequest;
use log::info;
use serde_json::json;

/// `POST /auth/register-admin`: bootstraps the first admin. Refused once any
/// admin account exists.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<RegisterAdminRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = payload.into_inner();
    if [&body.code, &body.username, &body.password]
        .iter()
        .any(|v| v.trim().is_empty())
    {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    }

    let fields = UserFields {
        code: body.code,
        username: body.username,
        role: Role::Admin,
        department: None,
    };
    let cost = state.bcrypt_cost;
    let admin = state
        .db
        .run(move |conn| {
            if directory::count_admins(conn)? > 0 {
                return Err(ApiError::Forbidden("An admin account already exists."));
            }
            directory::create(conn, &fields, &body.password, cost)
        })
        .await?;

    state
        .audit
        .record(
            Activity::new(ActionType::CreateUser, &req)
                .target(admin.id)
                .details(json!({
                    "code": admin.code,
                    "username": admin.username,
                    "role": admin.role,
                })),
        )
        .await;
    info!("Registered initial admin {}", admin.code);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Admin registered successfully",
    })))
}
