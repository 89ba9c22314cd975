//! Membership entity - a user's row in a club

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Role held by a club member.
///
/// Ownership is not a role: it lives on `Club::owner_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MembershipRole {
    #[default]
    Member,
    Moderator,
    Admin,
}

impl MembershipRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    /// Moderators and admins may moderate discussions
    pub const fn can_moderate(self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }
}

impl fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

/// Club membership entity (junction between User and Club)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubMembership {
    pub id: Snowflake,
    pub club_id: Snowflake,
    pub user_id: Snowflake,
    pub role: MembershipRole,
    /// Gates access to private clubs and eligibility for ownership transfer
    pub is_approved: bool,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClubMembership {
    pub fn new(
        id: Snowflake,
        club_id: Snowflake,
        user_id: Snowflake,
        role: MembershipRole,
        is_approved: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            club_id,
            user_id,
            role,
            is_approved,
            joined_at: now,
            updated_at: now,
        }
    }

    /// Membership of a club creator: approved admin
    pub fn founder(id: Snowflake, club_id: Snowflake, user_id: Snowflake) -> Self {
        Self::new(id, club_id, user_id, MembershipRole::Admin, true)
    }

    pub fn approve(&mut self) {
        self.is_approved = true;
        self.updated_at = Utc::now();
    }

    pub fn set_role(&mut self, role: MembershipRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}

/// Owner-side edit of an existing membership row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Approve,
    SetRole(MembershipRole),
}

impl MembershipChange {
    /// Apply the edit; `false` when the row already matched
    pub fn apply(self, membership: &mut ClubMembership) -> bool {
        match self {
            Self::Approve if !membership.is_approved => membership.approve(),
            Self::SetRole(role) if membership.role != role => membership.set_role(role),
            _ => return false,
        }
        true
    }
}
