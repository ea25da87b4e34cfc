//! User Account Service Server
//!
//! HTTP server exposing user registration, self-service update and soft
//! deletion. Runs against PostgreSQL when `DATABASE_URL` is set and falls
//! back to an in-memory store otherwise.

use std::sync::Arc;

use dotenv::dotenv;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use user_account_service::{
    api::{create_routes, AppState},
    config::AppConfig,
    database::DatabaseConfig,
    repository::{InMemoryUserStore, PgUserStore, UserStore},
    service::{JwtService, UserService},
    utils::security::BcryptPasswordEncoder,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv().ok();

    env_logger::init();

    log::info!(
        "🚀 Starting User Account Service v{}",
        user_account_service::VERSION
    );

    let config = AppConfig::from_env()?;
    config.validate()?;

    log::info!("✅ Configuration loaded and validated");

    let store: Arc<dyn UserStore> = match &config.database {
        Some(settings) => {
            let database_pool = settings.connection_config().create_pool().await?;

            log::info!("🔄 Running database migrations...");
            DatabaseConfig::run_migrations(&database_pool).await?;
            log::info!("✅ Database migrations completed");

            Arc::new(PgUserStore::new(database_pool))
        }
        None => {
            log::warn!("⚠️  DATABASE_URL not set, users are kept in memory only");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let user_service = Arc::new(UserService::new(
        store,
        Arc::new(BcryptPasswordEncoder::new(config.password.bcrypt_cost)),
    ));
    let jwt_service = Arc::new(JwtService::with_expiration(
        config.jwt.access_secret.clone(),
        chrono::Duration::hours(config.jwt.access_token_expires_hours),
    ));

    log::info!(
        "✅ Services initialized (bcrypt cost {})",
        config.password.bcrypt_cost
    );

    let app = create_routes(jwt_service)
        .with_state(AppState { user_service })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .into_inner(),
        );

    let bind_addr = config.server.bind_addr();
    log::info!("🌐 Starting server on {}", bind_addr);

    log::info!("📋 API Endpoints:");
    log::info!("   GET    /health - Health check");
    log::info!("   POST   /users - Register user");
    log::info!("   PATCH  /users/{{id}} - Update own user (bearer token)");
    log::info!("   DELETE /users/{{id}} - Delete own user (bearer token)");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("✅ Server listening and ready for requests");
    axum::serve(listener, app).await?;

    Ok(())
}
