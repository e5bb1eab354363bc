use actix_web::{web, HttpResponse};
use bl_core::repositories::UserRepository;
use bl_shared::ApiResponse;
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::ChangePasswordRequest;
use crate::handlers::error::{handle_domain_error, handle_validation_errors};
use crate::middleware::auth::AuthContext;

/// Handler for PUT /api/user/me/password
///
/// Issued tokens stay valid after the change until they expire.
///
/// ## Errors
/// - 400 Bad Request: Weak new password, or same as the old one
/// - 401 Unauthorized: Wrong old password
pub async fn change_password<U>(
    state: web::Data<AppState<U>>,
    auth: AuthContext,
    request: web::Json<ChangePasswordRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .auth_service
        .change_password(auth.user_id, &request.old_password, &request.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::<()>::message("Password changed")),
        Err(error) => handle_domain_error(error),
    }
}
