//! # User Service Module
//!
//! Account management for admin-level callers. Listing joins each account
//! with its latest login/logout event so the panel can show who is online.

mod create;
mod delete;
pub mod directory;
mod list;
mod update;

use crate::error::ApiError;
use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;
use common::model::role::Role;
use common::requests::non_empty;
use directory::UserFields;

/// The base path for the user endpoints.
const USERS_API_PATH: &str = "/users";

/// Returns an Actix `Scope` for:
///
/// * `GET /users`: every account with presence.
/// * `POST /users`: create an account.
/// * `PUT /users/{id}`: rewrite an account, optionally resetting the password.
/// * `DELETE /users/{id}`: delete any account except the caller's own.
pub fn configure_routes() -> Scope {
    scope(USERS_API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/{id}", put().to(update::process))
        .route("/{id}", delete().to(delete::process))
}

/// Validates the identity columns shared by create and update.
fn required_fields(
    code: &Option<String>,
    username: &Option<String>,
    role: Option<Role>,
    department: &Option<String>,
) -> Result<UserFields, ApiError> {
    match (non_empty(code), non_empty(username), role) {
        (Some(code), Some(username), Some(role)) => Ok(UserFields {
            code: code.to_string(),
            username: username.to_string(),
            role,
            department: non_empty(department).map(str::to_string),
        }),
        _ => Err(ApiError::BadRequest("Missing required fields".into())),
    }
}
