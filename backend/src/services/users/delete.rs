//! # User Deletion
//!
//! Backs `DELETE /users/{id}`. The caller can never delete their own account.
//! The deleted account is read back first so the `DELETE_USER` row can name
//! it; when nothing matched, no row is written and the answer is the same
//! success body.

use crate::audit::Activity;
use crate::auth::AdminOnly;
use crate::error::ApiError;
use crate::services::users::directory;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::activity::ActionType;
use serde_json::json;

/// `DELETE /users/{id}`.
///
/// # Arguments
/// * `admin` - The admin-level caller; may not name their own id.
/// * `id` - The account to delete.
///
/// # Returns
/// - `200 OK` with `{success, message}` whether or not the account existed.
/// - `400 Cannot delete yourself` when `id` is the caller's own.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    admin: AdminOnly,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let actor_id = admin.id;
    let removed = state
        .db
        .run(move |conn| directory::delete(conn, actor_id, id))
        .await?;

    if let Some(user) = removed {
        state
            .audit
            .record(
                Activity::new(ActionType::DeleteUser, &req)
                    .by(&admin)
                    .target(id)
                    .details(json!({
                        "info": format!("Deleted user: {} ({})", user.username, user.code),
                        "role": user.role,
                    })),
            )
            .await;
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User deleted successfully",
    })))
}
