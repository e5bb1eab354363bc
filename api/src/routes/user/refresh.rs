use actix_web::{web, HttpRequest, HttpResponse};
use bl_core::errors::TokenError;
use bl_core::repositories::UserRepository;
use bl_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::RefreshTokenRequest;
use crate::handlers::error::handle_domain_error;

use super::cookie::{attach_refresh_cookie, read_refresh_cookie};

/// Handler for POST /api/user/refresh-token
///
/// Exchanges a refresh token for a new pair. The token is read from the
/// body first, then from the refresh cookie.
///
/// # Request Body
///
/// ```json
/// { "refreshToken": "eyJ..." }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing, invalid or expired refresh token
pub async fn refresh_token<U>(
    req: HttpRequest,
    state: web::Data<AppState<U>>,
    request: Option<web::Json<RefreshTokenRequest>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    let token = request
        .and_then(|body| body.into_inner().refresh_token)
        .filter(|t| !t.trim().is_empty())
        .or_else(|| read_refresh_cookie(&req, &state.refresh_cookie));

    let token = match token {
        Some(token) => token,
        None => return handle_domain_error(TokenError::TokenMissing.into()),
    };

    match state.auth_service.refresh(&token).await {
        Ok(tokens) => {
            let mut builder = HttpResponse::Ok();
            attach_refresh_cookie(
                &mut builder,
                &state.refresh_cookie,
                &tokens.refresh_token,
                state.auth_service.token_service().refresh_ttl().num_seconds(),
            );
            builder.json(ApiResponse::success(tokens))
        }
        Err(error) => handle_domain_error(error),
    }
}
