use actix_web::{web, HttpResponse};
use bl_core::domain::entities::token::Role;
use bl_core::repositories::UserRepository;
use bl_shared::ApiResponse;

use crate::app::AppState;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::{require_role, AuthContext};

use super::positive_id;

/// Handler for DELETE /api/user/{id}, admin only
///
/// Soft delete. The username can be registered again afterwards.
///
/// ## Errors
/// - 400 Bad Request: Deleting your own account
/// - 404 Not Found: No live account with that id
pub async fn delete_user<U>(
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

    match state.user_service.delete_user(auth.user_id, user_id).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::<()>::message("User deleted")),
        Err(error) => handle_domain_error(error),
    }
}
