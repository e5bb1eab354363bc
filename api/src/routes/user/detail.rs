use actix_web::{web, HttpResponse};
use bl_core::domain::entities::token::Role;
use bl_core::repositories::UserRepository;
use bl_shared::ApiResponse;

use crate::app::AppState;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::{require_role, AuthContext};

use super::positive_id;

/// Handler for GET /api/user/{id}, admin only
///
/// Returns the full account record minus the password hash.
pub async fn detail<U>(
    state: web::Data<AppState<U>>,
    auth: AuthContext,
    path: web::Path<u64>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    if let Err(error) = require_role(&auth, Role::Admin) {
        return handle_domain_error(error);
    }

    let user_id = match positive_id(path.into_inner()) {
        Ok(id) => id,
        Err(error) => return handle_domain_error(error),
    };

    match state.auth_service.current_user(user_id).await {
        Ok(user) => HttpResponse::Ok().json(ApiResponse::success(user)),
        Err(error) => handle_domain_error(error),
    }
}
