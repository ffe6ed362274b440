//! # Checksheet Service Module
//!
//! CRUD and filtered search over checksheet records. Read paths are open to
//! any signed-in caller but scoped to the caller's department when the caller
//! is staff-level; the admin mutations require an admin-level role. Every
//! mutation appends an activity row after it commits.
//!
//! These routes sit at the root of the API (`/new`, `/search`, ...) next to
//! other services, so they are registered individually rather than under one
//! scope.

mod create;
mod delete;
mod list;
mod load;
mod load_by_machine;
mod options;
pub mod repository;
mod save;
mod search;
mod update;

use actix_web::web;

/// Registers the checksheet routes:
///
/// * `POST /new`: create an empty record (admin).
/// * `GET /db`: every record, unfiltered (admin).
/// * `GET /options`: cascading dropdown values.
/// * `GET /search`: filtered summaries, newest first.
/// * `PUT /update/{id}`: set name and payload (admin).
/// * `POST /api/save-form`: insert or update from a filled form.
/// * `GET /api/load-form/{id}`: one record by id.
/// * `GET /api/load-form-by-machine`: latest record for a machine slot.
/// * `DELETE /api/delete-form/{id}`: remove a record (admin).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/new", web::post().to(create::process))
        .route("/db", web::get().to(list::process))
        .route("/options", web::get().to(options::process))
        .route("/search", web::get().to(search::process))
        .route("/update/{id}", web::put().to(update::process))
        .route("/api/save-form", web::post().to(save::process))
        .route("/api/load-form-by-machine", web::get().to(load_by_machine::process))
        .route("/api/load-form/{id}", web::get().to(load::process))
        .route("/api/delete-form/{id}", web::delete().to(delete::process));
}

/// Rejects blank slot fields; the slot columns are mandatory.
fn require_fields(fields: &[(&str, &str)]) -> Result<(), crate::error::ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(crate::error::ApiError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}
