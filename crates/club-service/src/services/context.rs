//! Service context - dependency container for services
//!
//! Holds the repositories, the optional user cache, and the token and ID
//! generators needed by services.

use std::sync::Arc;

use club_cache::UserCache;
use club_common::auth::JwtService;
use club_core::traits::{ClubRepository, MembershipRepository, UserRepository};
use club_core::{Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cheap to clone; every dependency is reference counted.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    club_repo: Arc<dyn ClubRepository>,
    membership_repo: Arc<dyn MembershipRepository>,

    // Cache
    user_cache: Option<UserCache>,

    // Services
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        club_repo: Arc<dyn ClubRepository>,
        membership_repo: Arc<dyn MembershipRepository>,
        user_cache: Option<UserCache>,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            user_repo,
            club_repo,
            membership_repo,
            user_cache,
            jwt_service,
            snowflake_generator,
        }
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the club repository
    pub fn club_repo(&self) -> &dyn ClubRepository {
        self.club_repo.as_ref()
    }

    /// Get the membership repository
    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    // === Cache ===

    /// Get the user cache, if Redis is configured
    pub fn user_cache(&self) -> Option<&UserCache> {
        self.user_cache.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("user_cache", &self.user_cache.is_some())
            .field("jwt_service", &self.jwt_service)
            .field("worker_id", &self.snowflake_generator.worker_id())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    club_repo: Option<Arc<dyn ClubRepository>>,
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    user_cache: Option<UserCache>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn club_repo(mut self, repo: Arc<dyn ClubRepository>) -> Self {
        self.club_repo = Some(repo);
        self
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    /// Optional; without it user lookups always hit the database
    pub fn user_cache(mut self, cache: Option<UserCache>) -> Self {
        self.user_cache = cache;
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.club_repo
                .ok_or_else(|| ServiceError::validation("club_repo is required"))?,
            self.membership_repo
                .ok_or_else(|| ServiceError::validation("membership_repo is required"))?,
            self.user_cache,
            self.jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            self.snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
        ))
    }
}
