mod audit;
mod auth;
mod config;
mod db;
mod error;
mod services;
mod state;


use crate::config::Config;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use env_logger::Env;
use log::{error, info};
use serde_json::json;

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "error": "API endpoint not found",
    }))
}

/// Body and query-string decoding failures answer in the same JSON shape as
/// every other error.
pub(crate) fn configure_api(cfg: &mut web::ServiceConfig, json_limit: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(json_limit)
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .configure(services::configure)
    .default_service(web::route().to(not_found));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    let state = AppState::from_config(&config).map_err(|e| {
        error!("Failed to open database {}: {}", config.database_path.display(), e);
        std::io::Error::other(e.to_string())
    })?;

    info!(
        "Database at {}, forms under {}",
        config.database_path.display(),
        config.forms_dir.display()
    );
    info!("Server running at http://{}:{}", config.host, config.port);

    let json_limit = config.json_limit_bytes;
    let data = web::Data::new(state);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(data.clone())
            .configure(|cfg| configure_api(cfg, json_limit))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
