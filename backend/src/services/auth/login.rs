//! # Login
//!
//! Backs `POST /auth/login`.
//!
//! ## Workflow
//!
//! 1.  **Lookup**: the account is read by code and the password checked with
//!     bcrypt, both on the blocking pool.
//! 2.  **Failure**: an unknown code and a wrong password take the same path.
//!     A `LOGIN_FAILURE` row is written against the attempted code and the
//!     caller gets `401 Invalid code or password`.
//! 3.  **Success**: a session token is signed for the account, set as the
//!     `token` cookie, and a `LOGIN_SUCCESS` row is written. That row is what
//!     the user directory reads to show the account as online.

use crate::audit::Activity;
use crate::auth::password;
use crate::error::ApiError;
use crate::services::auth::session_cookie;
use crate::services::users::directory;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::activity::ActionType;
use common::model::user::Identity;
use common::requests::LoginRequest;
use log::info;
use serde_json::json;

/// `POST /auth/login`.
///
/// Unknown code and wrong password fail identically, and both are logged as
/// `LOGIN_FAILURE` against the attempted code.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let LoginRequest { code, password: plain } = payload.into_inner();

    let lookup_code = code.clone();
    let user = state
        .db
        .run(move |conn| {
            Ok(directory::find_by_code(conn, &lookup_code)?
                .filter(|stored| password::verify(&plain, &stored.password_hash))
                .map(|stored| stored.info))
        })
        .await?;

    let Some(user) = user else {
        state
            .audit
            .record(
                Activity::new(ActionType::LoginFailure, &req)
                    .code(code)
                    .details("Invalid code or password"),
            )
            .await;
        return Err(ApiError::InvalidCredentials);
    };

    let identity = Identity {
        id: user.id,
        code: user.code.clone(),
        username: user.username.clone(),
        role: user.role,
        department: user.department.clone(),
    };
    let token = state.sessions.issue(&identity)?;

    state
        .audit
        .record(Activity::new(ActionType::LoginSuccess, &req).by(&identity))
        .await;
    info!("User {} logged in", identity.code);

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, state.sessions.ttl()))
        .json(json!({ "success": true, "user": user })))
}
