//! Account and session route handlers under `/api/user`
//!
//! - Registration, login and token refresh
//! - Logout (client-side; clears the refresh cookie)
//! - Current-user profile, profile edit and password change
//! - Profile and detail lookups guarded by role
//! - Admin listing, statistics, password reset, soft delete and role changes

pub mod cookie;
pub mod delete;
pub mod detail;
pub mod list;
pub mod login;
pub mod logout;
pub mod me;
pub mod password;
pub mod profile;
pub mod refresh;
pub mod register;
pub mod reset_password;
pub mod role;
pub mod stats;
pub mod update;

use actix_web::web;
use bl_core::errors::{DomainError, ValidationError};
use bl_core::repositories::UserRepository;

use crate::middleware::auth::JwtAuth;

/// Rejects the id `0`, which no stored account can have
pub(crate) fn positive_id(id: u64) -> Result<u64, DomainError> {
    if id == 0 {
        return Err(ValidationError::field("id", "must be a positive integer").into());
    }
    Ok(id)
}

/// Registers the user routes on a scope
///
/// Literal segments (`/me`, `/stats/all`) are registered before `/{id}` so
/// they win.
pub fn configure<U>(cfg: &mut web::ServiceConfig)
where
    U: UserRepository + 'static,
{
    cfg.route("", web::get().to(list::list_users::<U>).wrap(JwtAuth::new()))
        .route("/register", web::post().to(register::register::<U>))
        .route("/login", web::post().to(login::login::<U>))
        .route("/refresh-token", web::post().to(refresh::refresh_token::<U>))
        .route(
            "/logout",
            web::post().to(logout::logout::<U>).wrap(JwtAuth::new()),
        )
        .route("/me", web::get().to(me::me::<U>).wrap(JwtAuth::new()))
        .route("/me", web::put().to(update::update_me::<U>).wrap(JwtAuth::new()))
        .route(
            "/me/password",
            web::put()
                .to(password::change_password::<U>)
                .wrap(JwtAuth::new()),
        )
        .route(
            "/stats/all",
            web::get().to(stats::stats::<U>).wrap(JwtAuth::new()),
        )
        .route(
            "/{user_id}/profile",
            web::get().to(profile::profile::<U>).wrap(JwtAuth::new()),
        )
        .route(
            "/{id}/password",
            web::put()
                .to(reset_password::reset_password::<U>)
                .wrap(JwtAuth::new()),
        )
        .route(
            "/{id}/promote",
            web::post().to(role::promote::<U>).wrap(JwtAuth::new()),
        )
        .route(
            "/{id}/demote",
            web::post().to(role::demote::<U>).wrap(JwtAuth::new()),
        )
        .route(
            "/{id}",
            web::get().to(detail::detail::<U>).wrap(JwtAuth::new()),
        )
        .route(
            "/{id}",
            web::delete()
                .to(delete::delete_user::<U>)
                .wrap(JwtAuth::new()),
        );
}
