//! Shared fixtures for HTTP tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use bl_api::app::AppState;
use bl_core::domain::entities::token::{Role, TokenPayload};
use bl_core::repositories::MockUserRepository;
use bl_core::services::auth::{AuthService, AuthServiceConfig};
use bl_core::services::token::{TokenService, TokenServiceConfig};
use bl_core::services::user::UserService;
use bl_shared::RefreshCookieConfig;

pub struct TestContext {
    pub repo: Arc<MockUserRepository>,
    pub tokens: Arc<TokenService>,
    pub state: web::Data<AppState<MockUserRepository>>,
    pub token_data: web::Data<TokenService>,
}

pub fn token_service() -> Arc<TokenService> {
    Arc::new(
        TokenService::new(TokenServiceConfig::new("test-access-secret", "test-refresh-secret"))
            .unwrap(),
    )
}

pub fn context(cookie_enabled: bool) -> TestContext {
    let repo = Arc::new(MockUserRepository::new());
    let tokens = token_service();
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&repo),
        Arc::clone(&tokens),
        AuthServiceConfig { bcrypt_cost: 4 },
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&repo),
        AuthServiceConfig { bcrypt_cost: 4 },
    ));
    let cookie = RefreshCookieConfig {
        enabled: cookie_enabled,
        ..Default::default()
    };

    TestContext {
        repo,
        token_data: web::Data::from(Arc::clone(&tokens)),
        tokens,
        state: web::Data::new(AppState::new(auth_service, user_service, cookie)),
    }
}

pub fn bearer(tokens: &TokenService, user_id: u64, role: Role) -> String {
    let token = tokens
        .issue_access_token(&TokenPayload::new(user_id, role), None)
        .unwrap();
    format!("Bearer {}", token)
}
