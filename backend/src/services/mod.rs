pub mod auth;
pub mod checksheets;
pub mod forms;
pub mod logs;
pub mod users;

use actix_web::web;

/// Mounts every API route. Scoped services first, then the root-level
/// checksheet and catalog routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::configure_routes())
        .service(users::configure_routes())
        .service(logs::configure_routes())
        .service(forms::configure_admin_routes())
        .configure(checksheets::configure_routes)
        .configure(forms::configure_routes);
}
