//! Club membership database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for club_memberships table
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub id: i64,
    pub club_id: i64,
    pub user_id: i64,
    pub role: String,
    pub is_approved: bool,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
