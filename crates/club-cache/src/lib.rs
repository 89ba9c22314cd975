//! # club-cache
//!
//! Redis caching layer for read-heavy lookups.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **User Cache**: Serialized user profiles keyed by ID with a TTL
//!
//! ## Example
//!
//! ```ignore
//! use club_cache::{RedisPool, RedisPoolConfig, UserCache};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let cache = UserCache::new(pool, 300);
//!
//! cache.set(&user).await?;
//! let cached = cache.get(user.id).await?;
//! ```

pub mod pool;
pub mod profile;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export profile cache types
pub use profile::{CachedUser, UserCache, USER_PREFIX};
