use actix_web::{web, HttpResponse};
use bl_core::domain::entities::token::Role;
use bl_core::repositories::UserRepository;
use bl_shared::ApiResponse;

use crate::app::AppState;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::{require_role, AuthContext};

/// Handler for GET /api/user/stats/all, admin only
pub async fn stats<U>(state: web::Data<AppState<U>>, auth: AuthContext) -> HttpResponse
where
    U: UserRepository + 'static,
{
    if let Err(error) = require_role(&auth, Role::Admin) {
        return handle_domain_error(error);
    }

    match state.user_service.stats().await {
        Ok(stats) => HttpResponse::Ok().json(ApiResponse::success(stats)),
        Err(error) => handle_domain_error(error),
    }
}
