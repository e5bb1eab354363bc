use actix_web::{web, HttpResponse};
use bl_core::repositories::UserRepository;
use bl_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::UserProfile;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::{require_self_or_admin, AuthContext};

/// Handler for GET /api/user/{user_id}/profile
///
/// Users may read their own profile; admins may read any.
pub async fn profile<U>(
    state: web::Data<AppState<U>>,
    auth: AuthContext,
    path: web::Path<u64>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    let user_id = path.into_inner();
    if let Err(error) = require_self_or_admin(&auth, user_id) {
        return handle_domain_error(error);
    }

    match state.auth_service.current_user(user_id).await {
        Ok(user) => HttpResponse::Ok().json(ApiResponse::success(UserProfile::from(user))),
        Err(error) => handle_domain_error(error),
    }
}
