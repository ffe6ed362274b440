//! Error type shared by every handler.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown code or wrong password; deliberately the same message for both.
    #[error("Invalid code or password")]
    InvalidCredentials,

    /// Missing, malformed or expired session token.
    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("User code already exists")]
    DuplicateCode,

    #[error("Cannot delete yourself")]
    SelfDeletion,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Maps a write failure to `DuplicateCode` when it tripped the unique index
    /// on `users.code`.
    pub fn from_user_write(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                ApiError::DuplicateCode
            }
            _ => ApiError::Storage(err),
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Storage(_)
            | ApiError::Io(_)
            | ApiError::Json(_)
            | ApiError::Hash(_)
            | ApiError::Token(_)
            | ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials | ApiError::Unauthenticated(_) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::DuplicateCode | ApiError::SelfDeletion | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_)
            | ApiError::Io(_)
            | ApiError::Json(_)
            | ApiError::Hash(_)
            | ApiError::Token(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }
        HttpResponse::build(status).json(json!({
            "success": false,
            "error": self.public_message(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Unauthenticated("Invalid token.").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("nope").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::DuplicateCode.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::SelfDeletion.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound("Form not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn server_errors_hide_details() {
        let err = ApiError::Storage(rusqlite::Error::InvalidQuery);
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Internal server error");
    }

    #[test]
    fn unique_violation_becomes_duplicate_code() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (code TEXT UNIQUE); INSERT INTO t VALUES ('E001');")
            .unwrap();
        let err = conn
            .execute("INSERT INTO t VALUES ('E001')", [])
            .unwrap_err();
        assert!(matches!(ApiError::from_user_write(err), ApiError::DuplicateCode));
    }
}
