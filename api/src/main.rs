use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_actix_web::TracingLogger;

use bl_api::app::{self, AppState};
use bl_api::config::{init_tracing, load_config};
use bl_api::middleware::cors::create_cors;
use bl_core::services::auth::{AuthService, AuthServiceConfig};
use bl_core::services::token::{TokenService, TokenServiceConfig};
use bl_core::services::user::UserService;
use bl_infra::{DatabasePool, MySqlUserRepository};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    init_tracing(&config.logging);

    info!(environment = %config.environment, "Starting blog server");

    let pool = DatabasePool::new(&config.database)
        .await
        .context("failed to connect to the database")?;

    let token_service = Arc::new(
        TokenService::new(TokenServiceConfig::from_jwt_config(&config.auth.jwt)?)
            .context("failed to build the token service")?,
    );
    let user_repository = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        Arc::clone(&token_service),
        AuthServiceConfig::from(&config.auth),
    ));
    let user_service = Arc::new(UserService::new(
        user_repository,
        AuthServiceConfig::from(&config.auth),
    ));

    let state = web::Data::new(AppState::new(
        auth_service,
        user_service,
        config.auth.refresh_cookie.clone(),
    ));
    let token_data = web::Data::from(token_service);

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let environment = config.environment;
    let cors_config = config.cors.clone();

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(token_data.clone())
            .wrap(create_cors(environment, &cors_config))
            .wrap(TracingLogger::default())
            .configure(app::configure::<MySqlUserRepository>)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    pool.close().await;
    Ok(())
}
