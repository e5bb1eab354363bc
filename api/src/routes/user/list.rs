use actix_web::{web, HttpResponse};
use bl_core::domain::entities::token::Role;
use bl_core::repositories::UserRepository;
use bl_shared::ApiResponse;
use validator::Validate;

use crate::app::AppState;
use crate::dto::user::{ListUsersQuery, UserListResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};
use crate::middleware::auth::{require_role, AuthContext};

/// Handler for GET /api/user, admin only
///
/// Query: `page` (default 1), `pageSize` (1-100, default 10), `role` (0 or 1).
pub async fn list_users<U>(
    state: web::Data<AppState<U>>,
    auth: AuthContext,
    query: web::Query<ListUsersQuery>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    if let Err(error) = require_role(&auth, Role::Admin) {
        return handle_domain_error(error);
    }
    if let Err(errors) = query.validate() {
        return handle_validation_errors(errors);
    }

    match state.user_service.list_users(query.to_query()).await {
        Ok(page) => HttpResponse::Ok().json(ApiResponse::success(UserListResponse::from(page))),
        Err(error) => handle_domain_error(error),
    }
}
