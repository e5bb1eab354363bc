//! Role changes. A changed role reaches the user's tokens on the next login,
//! or when the current refresh token expires.

use actix_web::{web, HttpResponse};
use bl_core::domain::entities::token::Role;
use bl_core::repositories::UserRepository;
use bl_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::UserProfile;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::{require_role, AuthContext};

use super::positive_id;

/// Handler for POST /api/user/{id}/promote, admin only
pub async fn promote<U>(
    state: web::Data<AppState<U>>,
    auth: AuthContext,
    path: web::Path<u64>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    change_role(state, auth, path.into_inner(), Role::Admin).await
}

/// Handler for POST /api/user/{id}/demote, admin only
pub async fn demote<U>(
    state: web::Data<AppState<U>>,
    auth: AuthContext,
    path: web::Path<u64>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    change_role(state, auth, path.into_inner(), Role::User).await
}

async fn change_role<U>(
    state: web::Data<AppState<U>>,
    auth: AuthContext,
    id: u64,
    role: Role,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    if let Err(error) = require_role(&auth, Role::Admin) {
        return handle_domain_error(error);
    }
    let user_id = match positive_id(id) {
        Ok(id) => id,
        Err(error) => return handle_domain_error(error),
    };

    let result = match role {
        Role::Admin => state.user_service.promote(auth.user_id, user_id).await,
        Role::User => state.user_service.demote(auth.user_id, user_id).await,
    };

    match result {
        Ok(user) => HttpResponse::Ok().json(
            ApiResponse::success(UserProfile::from(user))
                .with_message(format!("Role set to {}", role)),
        ),
        Err(error) => handle_domain_error(error),
    }
}
