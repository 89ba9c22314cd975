//! User entity

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Registered reader account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Snowflake, username: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            display_name: None,
            bio: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Display name if set, otherwise the username
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }

    pub fn update_profile(
        &mut self,
        display_name: Option<String>,
        bio: Option<String>,
        avatar_url: Option<String>,
    ) {
        if display_name.is_some() {
            self.display_name = display_name;
        }
        if bio.is_some() {
            self.bio = bio;
        }
        if avatar_url.is_some() {
            self.avatar_url = avatar_url;
        }
        self.updated_at = Utc::now();
    }
}
