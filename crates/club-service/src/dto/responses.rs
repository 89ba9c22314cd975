//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// Common Response Types
// ============================================================================

/// Offset-paginated list
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub limit: i64,
    pub offset: i64,
}

impl<T> PageResponse<T> {
    pub fn new(data: Vec<T>, limit: i64, offset: i64) -> Self {
        Self {
            data,
            limit,
            offset,
        }
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUserResponse,
}

// ============================================================================
// User Responses
// ============================================================================

/// Public user profile
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The authenticated user's own profile
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Club Responses
// ============================================================================

/// Club response
#[derive(Debug, Clone, Serialize)]
pub struct ClubResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub genre: Option<String>,
    pub is_private: bool,
    pub max_members: Option<i32>,
    pub members_count: i32,
    pub owner_id: Option<String>,
    pub average_rating: f64,
    pub ratings_count: i32,
    pub tags: Vec<String>,
    pub current_book: Option<Value>,
    pub next_meeting: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Membership Responses
// ============================================================================

/// A membership row, with the member's profile when it is still available
#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub club_id: String,
    pub user_id: String,
    pub role: String,
    pub is_approved: bool,
    pub is_owner: bool,
    pub joined_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

/// Result of a leave request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LeaveResponse {
    /// A member left; the club stays active
    Left {
        club_id: String,
        user_id: String,
        members_count: i32,
    },
    /// The owner left after handing the club over
    Transferred {
        club_id: String,
        previous_owner_id: String,
        new_owner_id: String,
        members_count: i32,
    },
    /// The owner closed the club
    Closed { club_id: String },
}

/// Whether a user may manage a club
#[derive(Debug, Clone, Serialize)]
pub struct ManageAccessResponse {
    pub club_id: String,
    pub can_manage: bool,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

fn check_label(healthy: bool) -> String {
    if healthy { "healthy" } else { "unhealthy" }.to_string()
}

impl ReadinessResponse {
    /// `redis_healthy` is `None` when no Redis is configured
    pub fn ready(database_healthy: bool, redis_healthy: Option<bool>) -> Self {
        let all_healthy = database_healthy && redis_healthy.unwrap_or(true);
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: check_label(database_healthy),
                redis: redis_healthy.map_or_else(|| "disabled".to_string(), check_label),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response() {
        assert_eq!(HealthResponse::healthy().status, "healthy");
    }

    #[test]
    fn test_readiness_response() {
        let ready = ReadinessResponse::ready(true, None);
        assert!(ready.is_ready());
        assert_eq!(ready.checks.redis, "disabled");

        let degraded = ReadinessResponse::ready(true, Some(false));
        assert!(!degraded.is_ready());
        assert_eq!(degraded.checks.redis, "unhealthy");

        let down = ReadinessResponse::ready(false, Some(true));
        assert_eq!(down.status, "not_ready");
        assert_eq!(down.checks.database, "unhealthy");
    }

    #[test]
    fn test_page_response_serializes_window() {
        let page = PageResponse::new(vec![1, 2], 2, 10);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["limit"], 2);
        assert_eq!(json["offset"], 10);
        assert_eq!(json["data"].as_array().map(Vec::len), Some(2));
    }
}
