//! User service
//!
//! Profile reads and updates. Lookups by ID go through the Redis user cache
//! when one is configured.

use club_core::entities::User;
use club_core::Snowflake;
use tracing::{debug, instrument, warn};

use crate::dto::{CurrentUserResponse, UpdateUserRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get the authenticated user's own profile
    #[instrument(skip(self))]
    pub async fn get_current_user(&self, user_id: Snowflake) -> ServiceResult<CurrentUserResponse> {
        let user = self.load_user(user_id).await?;
        Ok(CurrentUserResponse::from(&user))
    }

    /// Get a user's public profile
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Snowflake) -> ServiceResult<UserResponse> {
        let user = self.load_user(user_id).await?;
        Ok(UserResponse::from(&user))
    }

    /// Update the authenticated user's profile
    #[instrument(skip(self, request))]
    pub async fn update_current_user(
        &self,
        user_id: Snowflake,
        request: UpdateUserRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        let mut user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        user.update_profile(request.display_name, request.bio, request.avatar_url);
        self.ctx.user_repo().update(&user).await?;

        if let Some(cache) = self.ctx.user_cache() {
            if let Err(e) = cache.invalidate(user_id).await {
                warn!(%user_id, error = %e, "Failed to invalidate cached user");
            }
        }

        Ok(CurrentUserResponse::from(&user))
    }

    /// Load a user, reading through the cache
    ///
    /// Cache failures are logged and never fail the request.
    async fn load_user(&self, user_id: Snowflake) -> ServiceResult<User> {
        let cache = self.ctx.user_cache();

        if let Some(cache) = cache {
            match cache.get(user_id).await {
                Ok(Some(user)) => {
                    debug!(%user_id, "User cache hit");
                    return Ok(user);
                }
                Ok(None) => {}
                Err(e) => warn!(%user_id, error = %e, "User cache read failed"),
            }
        }

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        if let Some(cache) = cache {
            if let Err(e) = cache.set(&user).await {
                warn!(%user_id, error = %e, "User cache write failed");
            }
        }

        Ok(user)
    }
}
