use actix_web::{web, HttpResponse};
use bl_core::repositories::UserRepository;
use bl_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::UserProfile;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/user/me
pub async fn me<U>(state: web::Data<AppState<U>>, auth: AuthContext) -> HttpResponse
where
    U: UserRepository + 'static,
{
    match state.auth_service.current_user(auth.user_id).await {
        Ok(user) => HttpResponse::Ok().json(ApiResponse::success(UserProfile::from(user))),
        Err(error) => handle_domain_error(error),
    }
}
