//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and most implement `Validate`.

use club_core::{DispositionRequest, Snowflake};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 64, message = "Display name must be 1-64 characters"))]
    pub display_name: Option<String>,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

// ============================================================================
// User Requests
// ============================================================================

/// Update current user request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 64, message = "Display name must be 1-64 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,

    #[validate(url(message = "Avatar must be a URL"))]
    pub avatar_url: Option<String>,
}

// ============================================================================
// Club Requests
// ============================================================================

/// Create club request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateClubRequest {
    #[validate(length(min = 1, max = 100, message = "Club name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 64, message = "Genre must be at most 64 characters"))]
    pub genre: Option<String>,

    #[serde(default)]
    pub is_private: bool,

    #[validate(range(min = 1, message = "max_members must be positive"))]
    pub max_members: Option<i32>,

    #[validate(length(max = 20, message = "At most 20 tags"))]
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Update club request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClubRequest {
    #[validate(length(min = 1, max = 100, message = "Club name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 64, message = "Genre must be at most 64 characters"))]
    pub genre: Option<String>,

    pub is_private: Option<bool>,

    #[validate(range(min = 1, message = "max_members must be positive"))]
    pub max_members: Option<i32>,

    #[validate(length(max = 20, message = "At most 20 tags"))]
    pub tags: Option<Vec<String>>,

    pub current_book: Option<Value>,

    pub next_meeting: Option<Value>,
}

/// Browse filters for public clubs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClubFilter {
    pub genre: Option<String>,
    pub location: Option<String>,
}

// ============================================================================
// Membership Requests
// ============================================================================

/// Change a member's role
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMemberRoleRequest {
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}

/// Body of a leave request
///
/// Only read when the caller owns the club. Both fields are kept as raw JSON
/// so a malformed value never fails a non-owner's leave.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveClubRequest {
    pub action: Option<Value>,
    pub new_owner_id: Option<Value>,
}

impl LeaveClubRequest {
    /// `action` as text. Any non-string JSON value is kept in its serialized
    /// form, which never names a valid disposition.
    pub fn action(&self) -> Option<String> {
        match self.action.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// `new_owner_id` as a Snowflake, accepting a string or a number
    pub fn new_owner(&self) -> Option<Snowflake> {
        match self.new_owner_id.as_ref()? {
            Value::String(s) => Snowflake::parse(s).ok(),
            Value::Number(n) => n.as_i64().map(Snowflake::new),
            _ => None,
        }
    }
}

impl From<LeaveClubRequest> for DispositionRequest {
    fn from(request: LeaveClubRequest) -> Self {
        Self {
            action: request.action(),
            new_owner_id: request.new_owner(),
        }
    }
}
