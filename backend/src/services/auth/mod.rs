//! # Auth Service Module
//!
//! Login and logout over the `token` session cookie, the current identity,
//! and the one-time bootstrap of the first admin account.

mod login;
mod logout;
mod me;
mod register_admin;

use crate::auth::session::SESSION_COOKIE;
use actix_web::cookie::{time, Cookie};
use actix_web::web::{get, post, scope};
use actix_web::Scope;

/// The base path for the auth endpoints.
const AUTH_API_PATH: &str = "/auth";

/// Returns an Actix `Scope` for:
///
/// * `POST /auth/login`: check credentials and set the session cookie.
/// * `POST /auth/logout`: clear the session cookie.
/// * `GET /auth/me`: the identity carried by the cookie.
/// * `POST /auth/register-admin`: create the first admin account.
pub fn configure_routes() -> Scope {
    scope(AUTH_API_PATH)
        .route("/login", post().to(login::process))
        .route("/logout", post().to(logout::process))
        .route("/me", get().to(me::process))
        .route("/register-admin", post().to(register_admin::process))
}

/// `HttpOnly` but not `Secure`: the panel is also served over plain HTTP
/// behind the factory proxy.
fn session_cookie(token: String, ttl: chrono::Duration) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .finish()
}

fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}
