use actix_web::{web, HttpResponse};
use bl_core::domain::entities::token::Role;
use bl_core::repositories::UserRepository;
use bl_shared::ApiResponse;
use validator::Validate;

use crate::app::AppState;
use crate::dto::user::ResetPasswordRequest;
use crate::handlers::error::{handle_domain_error, handle_validation_errors};
use crate::middleware::auth::{require_role, AuthContext};

use super::positive_id;

/// Handler for PUT /api/user/{id}/password, admin only
///
/// Sets a new password without the old one. Tokens already issued to the
/// user stay valid until they expire.
pub async fn reset_password<U>(
    state: web::Data<AppState<U>>,
    auth: AuthContext,
    path: web::Path<u64>,
    request: web::Json<ResetPasswordRequest>,
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
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .user_service
        .reset_password(user_id, &request.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::<()>::message("Password reset")),
        Err(error) => handle_domain_error(error),
    }
}
