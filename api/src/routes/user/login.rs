use actix_web::{web, HttpResponse};
use bl_core::repositories::UserRepository;
use bl_shared::ApiResponse;
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::{LoginRequest, LoginResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use super::cookie::attach_refresh_cookie;

/// Handler for POST /api/user/login
///
/// Returns the user profile and a fresh token pair.
///
/// ## Errors
/// - 400 Bad Request: Empty username or password
/// - 401 Unauthorized: Unknown user or wrong password
pub async fn login<U>(
    state: web::Data<AppState<U>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .auth_service
        .login(&request.username, &request.password)
        .await
    {
        Ok((user, tokens)) => {
            let mut builder = HttpResponse::Ok();
            attach_refresh_cookie(
                &mut builder,
                &state.refresh_cookie,
                &tokens.refresh_token,
                state.auth_service.token_service().refresh_ttl().num_seconds(),
            );
            builder.json(ApiResponse::success(LoginResponse {
                user: user.into(),
                tokens,
            }))
        }
        Err(error) => handle_domain_error(error),
    }
}
