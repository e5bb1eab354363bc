use actix_web::{web, HttpResponse};
use bl_core::repositories::UserRepository;
use bl_shared::ApiResponse;
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::UserProfile;
use crate::dto::user::UpdateProfileRequest;
use crate::handlers::error::{handle_domain_error, handle_validation_errors};
use crate::middleware::auth::AuthContext;

/// Handler for PUT /api/user/me
///
/// Only `nickname` and `avatar` can change; other body fields are ignored.
///
/// ## Errors
/// - 400 Bad Request: Invalid field, or neither field present
pub async fn update_me<U>(
    state: web::Data<AppState<U>>,
    auth: AuthContext,
    request: web::Json<UpdateProfileRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .user_service
        .update_profile(auth.user_id, request.into_inner().into())
        .await
    {
        Ok(user) => HttpResponse::Ok().json(
            ApiResponse::success(UserProfile::from(user)).with_message("Profile updated"),
        ),
        Err(error) => handle_domain_error(error),
    }
}
