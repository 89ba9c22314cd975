//! Cached user profiles.

mod user_cache;

pub use user_cache::{CachedUser, UserCache, USER_PREFIX};
