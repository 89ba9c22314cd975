//! User profile cache in Redis.
//!
//! Profiles are written on read-miss and dropped on profile update, so a
//! stale entry lives at most one TTL.

use chrono::{DateTime, Utc};
use club_core::{Snowflake, User};
use serde::{Deserialize, Serialize};

use crate::pool::{RedisPool, RedisResult};

/// Key prefix for cached user profiles
pub const USER_PREFIX: &str = "user:";

/// Serialized form of a user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedUser {
    pub id: Snowflake,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for CachedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            bio: user.bio.clone(),
            avatar_url: user.avatar_url.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<CachedUser> for User {
    fn from(cached: CachedUser) -> Self {
        Self {
            id: cached.id,
            username: cached.username,
            email: cached.email,
            display_name: cached.display_name,
            bio: cached.bio,
            avatar_url: cached.avatar_url,
            created_at: cached.created_at,
            updated_at: cached.updated_at,
        }
    }
}

/// Read-through cache for user profiles
#[derive(Debug, Clone)]
pub struct UserCache {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl UserCache {
    #[must_use]
    pub fn new(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn key(user_id: Snowflake) -> String {
        format!("{USER_PREFIX}{user_id}")
    }

    /// Get a cached profile
    pub async fn get(&self, user_id: Snowflake) -> RedisResult<Option<User>> {
        let cached: Option<CachedUser> = self.pool.get_json(&Self::key(user_id)).await?;
        Ok(cached.map(User::from))
    }

    /// Cache a profile for the configured TTL
    pub async fn set(&self, user: &User) -> RedisResult<()> {
        self.pool
            .set_json(&Self::key(user.id), &CachedUser::from(user), self.ttl_seconds)
            .await
    }

    /// Drop a cached profile
    pub async fn invalidate(&self, user_id: Snowflake) -> RedisResult<bool> {
        self.pool.delete(&Self::key(user_id)).await
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }
}
