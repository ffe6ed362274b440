use crate::audit::AuditLog;
use crate::auth::session::SessionKeys;
use crate::config::Config;
use crate::db::Database;
use crate::error::ApiError;
use crate::services::forms::catalog::FormCatalog;

/// Everything a handler needs, built once in `main` and shared through
/// `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionKeys,
    pub audit: AuditLog,
    pub catalog: FormCatalog,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let db = Database::open(&config.database_path)?;
        Ok(AppState {
            audit: AuditLog::new(db.clone()),
            sessions: SessionKeys::new(&config.jwt_secret, config.session_ttl_hours),
            catalog: FormCatalog::new(&config.forms_dir),
            bcrypt_cost: config.bcrypt_cost,
            db,
        })
    }
}
