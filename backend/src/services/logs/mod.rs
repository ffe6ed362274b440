//! # Activity Log Service Module
//!
//! Read side of the audit trail. Rows are written by `crate::audit` from the
//! handlers that mutate state; this module only filters and returns them.

pub mod history;
mod list;

use actix_web::web::{get, scope};
use actix_web::Scope;

/// The base path for the log endpoint.
const LOGS_API_PATH: &str = "/logs";

/// Returns an Actix `Scope` for `GET /logs` (admin-level only).
pub fn configure_routes() -> Scope {
    scope(LOGS_API_PATH).route("", get().to(list::process))
}
