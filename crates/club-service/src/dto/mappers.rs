//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use club_core::entities::{Club, ClubMembership, User};
use club_core::LeaveOutcome;

use super::responses::{
    ClubResponse, CurrentUserResponse, LeaveResponse, MemberResponse, UserResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            bio: user.bio.clone(),
            avatar_url: user.avatar_url.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
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

// ============================================================================
// Club Mappers
// ============================================================================

impl From<Club> for ClubResponse {
    fn from(club: Club) -> Self {
        Self {
            id: club.id.to_string(),
            name: club.name,
            description: club.description,
            location: club.location,
            genre: club.genre,
            is_private: club.is_private,
            max_members: club.max_members,
            members_count: club.members_count,
            owner_id: club.owner_id.map(|id| id.to_string()),
            average_rating: club.average_rating,
            ratings_count: club.ratings_count,
            tags: club.tags,
            current_book: club.current_book,
            next_meeting: club.next_meeting,
            created_at: club.created_at,
            updated_at: club.updated_at,
        }
    }
}

// ============================================================================
// Membership Mappers
// ============================================================================

/// Membership joined with its club's owner and the member's profile
pub struct MemberWithUser<'a> {
    pub membership: ClubMembership,
    pub club: &'a Club,
    pub user: Option<User>,
}

impl From<MemberWithUser<'_>> for MemberResponse {
    fn from(value: MemberWithUser<'_>) -> Self {
        let MemberWithUser {
            membership,
            club,
            user,
        } = value;
        Self {
            id: membership.id.to_string(),
            club_id: membership.club_id.to_string(),
            user_id: membership.user_id.to_string(),
            role: membership.role.to_string(),
            is_approved: membership.is_approved,
            is_owner: club.is_owner(membership.user_id),
            joined_at: membership.joined_at,
            user: user.as_ref().map(UserResponse::from),
        }
    }
}

// ============================================================================
// Leave Mappers
// ============================================================================

impl From<LeaveOutcome> for LeaveResponse {
    fn from(outcome: LeaveOutcome) -> Self {
        match outcome {
            LeaveOutcome::Left {
                club_id,
                user_id,
                members_count,
            } => Self::Left {
                club_id: club_id.to_string(),
                user_id: user_id.to_string(),
                members_count,
            },
            LeaveOutcome::Transferred {
                club_id,
                previous_owner_id,
                new_owner_id,
                members_count,
            } => Self::Transferred {
                club_id: club_id.to_string(),
                previous_owner_id: previous_owner_id.to_string(),
                new_owner_id: new_owner_id.to_string(),
                members_count,
            },
            LeaveOutcome::Closed { club_id } => Self::Closed {
                club_id: club_id.to_string(),
            },
        }
    }
}
