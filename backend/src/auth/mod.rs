//! Session extraction for handlers.
//!
//! Handlers ask for an [`Identity`]-bearing extractor instead of calling the
//! checks themselves: [`Authenticated`] requires a valid session cookie,
//! [`AdminOnly`] additionally requires an admin-level role.

pub mod password;
pub mod policy;
pub mod session;

use crate::error::ApiError;
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use common::model::user::Identity;
use futures_util::future::{ready, Ready};
use std::ops::Deref;

pub fn require_authenticated(req: &HttpRequest) -> Result<Identity, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("application state is not registered".into()))?;
    let cookie = req
        .cookie(session::SESSION_COOKIE)
        .ok_or(ApiError::Unauthenticated("Access denied. No token provided."))?;
    state.sessions.verify(cookie.value())
}

pub struct Authenticated(pub Identity);

impl Deref for Authenticated {
    type Target = Identity;

    fn deref(&self) -> &Identity {
        &self.0
    }
}

impl FromRequest for Authenticated {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(require_authenticated(req).map(Authenticated))
    }
}

pub struct AdminOnly(pub Identity);

impl Deref for AdminOnly {
    type Target = Identity;

    fn deref(&self) -> &Identity {
        &self.0
    }
}

impl FromRequest for AdminOnly {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(require_authenticated(req).and_then(|identity| {
            policy::require_admin_level(&identity)?;
            Ok(AdminOnly(identity))
        }))
    }
}
