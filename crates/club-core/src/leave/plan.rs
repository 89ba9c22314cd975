use crate::entities::{Club, ClubMembership};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

use super::disposition::{DispositionRequest, LeaveDisposition};

/// A request by `user_id` to leave `club_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveRequest {
    pub club_id: Snowflake,
    pub user_id: Snowflake,
    pub disposition: Option<DispositionRequest>,
}

impl LeaveRequest {
    pub fn new(club_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            club_id,
            user_id,
            disposition: None,
        }
    }

    pub fn with_disposition(mut self, disposition: impl Into<DispositionRequest>) -> Self {
        self.disposition = Some(disposition.into());
        self
    }
}

/// State change a validated leave request resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeavePlan {
    /// Delete one non-owner membership and recount
    RemoveMember {
        club_id: Snowflake,
        user_id: Snowflake,
    },
    /// Move `owner_id`, delete the previous owner's membership and recount
    Transfer {
        club_id: Snowflake,
        previous_owner_id: Snowflake,
        new_owner_id: Snowflake,
    },
    /// Soft-delete the club and every membership
    Close { club_id: Snowflake },
}

impl LeavePlan {
    pub fn club_id(&self) -> Snowflake {
        match *self {
            Self::RemoveMember { club_id, .. }
            | Self::Transfer { club_id, .. }
            | Self::Close { club_id } => club_id,
        }
    }

    /// The membership row this plan deletes, if it deletes exactly one
    pub fn departing_user(&self) -> Option<Snowflake> {
        match *self {
            Self::RemoveMember { user_id, .. } => Some(user_id),
            Self::Transfer {
                previous_owner_id, ..
            } => Some(previous_owner_id),
            Self::Close { .. } => None,
        }
    }

    /// Describe the applied plan given the recounted membership total
    pub fn into_outcome(self, members_count: i32) -> LeaveOutcome {
        match self {
            Self::RemoveMember { club_id, user_id } => LeaveOutcome::Left {
                club_id,
                user_id,
                members_count,
            },
            Self::Transfer {
                club_id,
                previous_owner_id,
                new_owner_id,
            } => LeaveOutcome::Transferred {
                club_id,
                previous_owner_id,
                new_owner_id,
                members_count,
            },
            Self::Close { club_id } => LeaveOutcome::Closed { club_id },
        }
    }
}

/// Committed result of a leave request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left {
        club_id: Snowflake,
        user_id: Snowflake,
        members_count: i32,
    },
    Transferred {
        club_id: Snowflake,
        previous_owner_id: Snowflake,
        new_owner_id: Snowflake,
        members_count: i32,
    },
    Closed {
        club_id: Snowflake,
    },
}

/// Decide what a leave request does to `club`.
///
/// `members` must be every membership row of the club as seen under the
/// club's row lock. Checks run in a fixed order so the same input always
/// fails with the same error:
///
/// 1. the actor must hold a membership row (`NotAMember`)
/// 2. non-owners leave; any disposition they sent is ignored
/// 3. the owner must send a disposition (`OwnerDispositionRequired`)
/// 4. a transfer needs a target (`NewOwnerRequired`) other than the owner
///    (`SameOwner`) who is a member (`NewOwnerNotAMember`) and approved
///    (`NewOwnerNotApproved`)
pub fn plan_leave(
    club: &Club,
    members: &[ClubMembership],
    request: &LeaveRequest,
) -> Result<LeavePlan, DomainError> {
    let membership_of = |user_id: Snowflake| members.iter().find(|m| m.user_id == user_id);

    if membership_of(request.user_id).is_none() {
        return Err(DomainError::NotAMember);
    }

    if !club.is_owner(request.user_id) {
        return Ok(LeavePlan::RemoveMember {
            club_id: club.id,
            user_id: request.user_id,
        });
    }

    let disposition = request
        .disposition
        .as_ref()
        .ok_or(DomainError::OwnerDispositionRequired)?
        .resolve()?;

    match disposition {
        LeaveDisposition::Transfer { new_owner_id } => {
            if new_owner_id == request.user_id {
                return Err(DomainError::SameOwner);
            }
            let target = membership_of(new_owner_id)
                .ok_or(DomainError::NewOwnerNotAMember(new_owner_id))?;
            if !target.is_approved {
                return Err(DomainError::NewOwnerNotApproved(new_owner_id));
            }
            Ok(LeavePlan::Transfer {
                club_id: club.id,
                previous_owner_id: request.user_id,
                new_owner_id,
            })
        }
        LeaveDisposition::Close => Ok(LeavePlan::Close { club_id: club.id }),
    }
}
