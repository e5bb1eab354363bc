//! Application state and route registration
//!
//! `main` builds the `App`, wraps it with middleware and calls `configure`.
//! Tests use the same `configure` with an in-memory user store.

use std::sync::Arc;

use actix_web::{error::InternalError, web, HttpResponse};
use bl_core::repositories::UserRepository;
use bl_core::services::auth::AuthService;
use bl_core::services::user::UserService;
use bl_shared::{error_codes, ErrorResponse, RefreshCookieConfig};

use crate::routes;

/// Shared handler state
pub struct AppState<U>
where
    U: UserRepository,
{
    /// Account and session flows
    pub auth_service: Arc<AuthService<U>>,
    /// Profile edits and admin account operations
    pub user_service: Arc<UserService<U>>,
    /// Refresh cookie transport settings
    pub refresh_cookie: RefreshCookieConfig,
}

impl<U> AppState<U>
where
    U: UserRepository,
{
    pub fn new(
        auth_service: Arc<AuthService<U>>,
        user_service: Arc<UserService<U>>,
        refresh_cookie: RefreshCookieConfig,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            refresh_cookie,
        }
    }
}

/// Registers every route, extractor config and the JSON 404 fallback
///
/// The caller must also register `web::Data<AppState<U>>` and
/// `web::Data<TokenService>`.
pub fn configure<U>(cfg: &mut web::ServiceConfig)
where
    U: UserRepository + 'static,
{
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .route("/health", web::get().to(routes::health_check))
        .service(web::scope("/api/user").configure(routes::user::configure::<U>))
        .default_service(web::route().to(routes::not_found));
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::BAD_REQUEST,
            format!("Invalid request body: {}", err),
        ));
        InternalError::from_response(err, response).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::BAD_REQUEST,
            format!("Invalid path parameter: {}", err),
        ));
        InternalError::from_response(err, response).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::BAD_REQUEST,
            format!("Invalid query string: {}", err),
        ));
        InternalError::from_response(err, response).into()
    })
}
