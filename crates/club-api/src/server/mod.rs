//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use club_cache::{RedisPool, UserCache};
use club_common::{AppConfig, AppError, JwtService};
use club_core::SnowflakeGenerator;
use club_db::{
    create_pool, run_migrations, DatabaseConfig, PgClubRepository, PgMembershipRepository,
    PgUserRepository,
};
use club_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();

    let api = apply_rate_limit(create_router(), &config.rate_limit)?;
    let router = apply_middleware(api.merge(health_routes()), config);

    Ok(router.with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Database
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        info!("Database migrations applied");
    }

    // Redis is optional; without it the user cache is disabled
    let redis_pool = match &config.redis {
        Some(redis_config) => {
            let redis_pool =
                RedisPool::from_config(redis_config).map_err(|e| AppError::Cache(e.to_string()))?;
            if let Err(e) = redis_pool.health_check().await {
                warn!(error = %e, "Redis is not reachable yet; cache reads will fall back to the database");
            }
            info!("Redis pool created");
            Some(redis_pool)
        }
        None => {
            info!("REDIS_URL not set; user cache disabled");
            None
        }
    };
    let user_cache = redis_pool.as_ref().zip(config.redis.as_ref()).map(|(pool, redis_config)| {
        UserCache::new(pool.clone(), redis_config.user_cache_ttl_secs)
    });

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .club_repo(Arc::new(PgClubRepository::new(pool.clone())))
        .membership_repo(Arc::new(PgMembershipRepository::new(pool.clone())))
        .user_cache(user_cache)
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool, redis_pool))
}

/// Serve the application on an already bound listener
///
/// Peer addresses are attached to requests for per-IP rate limiting.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;
    info!("Server listening on http://{}", addr);

    serve(listener, app).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
