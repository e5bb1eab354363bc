use actix_web::{web, HttpResponse};
use bl_core::repositories::UserRepository;
use bl_shared::ApiResponse;
use tracing::info;

use crate::app::AppState;
use crate::middleware::auth::AuthContext;

use super::cookie::clear_refresh_cookie;

/// Handler for POST /api/user/logout
///
/// Tokens are stateless, so logout only expires the refresh cookie. The
/// client discards its copies.
pub async fn logout<U>(state: web::Data<AppState<U>>, auth: AuthContext) -> HttpResponse
where
    U: UserRepository + 'static,
{
    info!(user_id = auth.user_id, "user logged out");

    let mut builder = HttpResponse::Ok();
    clear_refresh_cookie(&mut builder, &state.refresh_cookie);
    builder.json(ApiResponse::<()>::message("Logged out successfully"))
}
