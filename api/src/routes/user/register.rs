use actix_web::{web, HttpResponse};
use bl_core::repositories::UserRepository;
use bl_core::services::auth::RegisterUser;
use bl_shared::ApiResponse;
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::{RegisterRequest, RegisterResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use super::cookie::attach_refresh_cookie;

/// Handler for POST /api/user/register
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "password": "Secret123", "nickname": "Alice" }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// { "success": true, "data": { "userId": 1, "accessToken": "...", "refreshToken": "...", "expiresIn": 3600 } }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Body fails validation
/// - 409 Conflict: Username taken
pub async fn register<U>(
    state: web::Data<AppState<U>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    let request = request.into_inner();
    let input = RegisterUser {
        username: request.username,
        password: request.password,
        nickname: request.nickname,
    };

    match state.auth_service.register(input).await {
        Ok((user, tokens)) => {
            let mut builder = HttpResponse::Created();
            attach_refresh_cookie(
                &mut builder,
                &state.refresh_cookie,
                &tokens.refresh_token,
                state.auth_service.token_service().refresh_ttl().num_seconds(),
            );
            builder.json(ApiResponse::success(RegisterResponse {
                user_id: user.id,
                tokens,
            }))
        }
        Err(error) => handle_domain_error(error),
    }
}
