//! Application state
//!
//! Holds the shared state for the Axum application: the service context, the
//! configuration, and the pools probed by the readiness check.

use std::sync::Arc;

use club_cache::RedisPool;
use club_common::{AppConfig, JwtService};
use club_db::PgPool;
use club_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    pool: PgPool,
    /// Present only when Redis is configured
    redis_pool: Option<RedisPool>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        service_context: ServiceContext,
        config: AppConfig,
        pool: PgPool,
        redis_pool: Option<RedisPool>,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            pool,
            redis_pool,
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the PostgreSQL pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the Redis pool, if configured
    pub fn redis_pool(&self) -> Option<&RedisPool> {
        self.redis_pool.as_ref()
    }

    /// Get the JWT service from the service context
    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("redis_enabled", &self.redis_pool.is_some())
            .finish_non_exhaustive()
    }
}
