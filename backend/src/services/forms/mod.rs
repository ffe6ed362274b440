//! # Form Catalog Service Module
//!
//! Fillable forms come from two places: template folders on disk
//! (`catalog`) and machine assignments in the database (`machines`). This
//! module exposes the merged list to every signed-in caller and the raw
//! pieces to admins.

mod assign_machine;
mod available;
pub mod catalog;
mod list_machines;
pub mod machines;
mod templates;
mod unassign_machine;

use actix_web::web::{delete, get, post, scope};
use actix_web::{web, Scope};

/// The base path for the admin-only catalog endpoints.
const ADMIN_API_PATH: &str = "/api/admin";

/// Registers `GET /available-forms` at the root.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/available-forms", get().to(available::process));
}

/// Admin routes under `/api/admin`:
///
/// * `GET /templates`: template folders with their `meta.json`.
/// * `GET /machines`: all machine assignments.
/// * `POST /machines`: assign a machine to a template.
/// * `DELETE /machines/{id}`: remove an assignment.
pub fn configure_admin_routes() -> Scope {
    scope(ADMIN_API_PATH)
        .route("/templates", get().to(templates::process))
        .route("/machines", get().to(list_machines::process))
        .route("/machines", post().to(assign_machine::process))
        .route("/machines/{id}", delete().to(unassign_machine::process))
}
