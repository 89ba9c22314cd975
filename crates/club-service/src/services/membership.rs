//! Membership service
//!
//! Join, approval, role changes, kicks, and the leave protocol. Owner-only
//! actions are gated on `Club::owner_id` as read under the club's row lock;
//! moderators and admins get no extra rights here.

use club_core::entities::{Club, ClubMembership, MembershipChange, MembershipRole};
use club_core::{DispositionRequest, DomainError, LeaveRequest, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    ClubResponse, LeaveClubRequest, LeaveResponse, ManageAccessResponse, MemberResponse,
    MemberWithUser, UpdateMemberRoleRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Membership service
pub struct MembershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MembershipService<'a> {
    /// Create a new MembershipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// List a club's members ordered by join time
    #[instrument(skip(self))]
    pub async fn list_members(
        &self,
        club_id: Snowflake,
        viewer_id: Snowflake,
    ) -> ServiceResult<Vec<MemberResponse>> {
        let club = self.find_club(club_id).await?;
        self.require_visible(&club, viewer_id).await?;

        let memberships = self.ctx.membership_repo().find_by_club(club_id).await?;
        let mut members = Vec::with_capacity(memberships.len());
        for membership in memberships {
            members.push(self.to_response(membership, &club).await?);
        }
        Ok(members)
    }

    /// Get one member of a club
    #[instrument(skip(self))]
    pub async fn get_member(
        &self,
        club_id: Snowflake,
        user_id: Snowflake,
        viewer_id: Snowflake,
    ) -> ServiceResult<MemberResponse> {
        let club = self.find_club(club_id).await?;
        self.require_visible(&club, viewer_id).await?;

        let membership = self.find_membership(club_id, user_id).await?;
        self.to_response(membership, &club).await
    }

    /// Clubs the user holds a membership in, pending ones included
    #[instrument(skip(self))]
    pub async fn list_user_clubs(&self, user_id: Snowflake) -> ServiceResult<Vec<ClubResponse>> {
        let clubs = self.ctx.club_repo().find_by_user(user_id).await?;
        Ok(clubs.into_iter().map(ClubResponse::from).collect())
    }

    /// Only the owner can manage a club; unknown clubs are unmanageable
    #[instrument(skip(self))]
    pub async fn can_manage_club(
        &self,
        club_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<ManageAccessResponse> {
        let can_manage = self
            .ctx
            .club_repo()
            .find_by_id(club_id)
            .await?
            .is_some_and(|club| club.is_owner(user_id));

        Ok(ManageAccessResponse {
            club_id: club_id.to_string(),
            can_manage,
        })
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Join a club; private clubs leave the membership pending approval
    #[instrument(skip(self))]
    pub async fn join_club(&self, club_id: Snowflake, user_id: Snowflake) -> ServiceResult<MemberResponse> {
        let club = self.find_club(club_id).await?;

        let membership = ClubMembership::new(
            self.ctx.generate_id(),
            club_id,
            user_id,
            MembershipRole::default(),
            club.auto_approves(),
        );
        let members_count = self.ctx.membership_repo().join(&membership).await?;

        info!(
            club_id = %club_id,
            user_id = %user_id,
            approved = membership.is_approved,
            members_count,
            "User joined club"
        );

        self.to_response(membership, &club).await
    }

    /// Approve a pending member (owner only)
    #[instrument(skip(self))]
    pub async fn approve_member(
        &self,
        club_id: Snowflake,
        actor_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<MemberResponse> {
        let membership = self
            .ctx
            .membership_repo()
            .update(club_id, actor_id, user_id, MembershipChange::Approve)
            .await?;

        info!(club_id = %club_id, user_id = %user_id, "Member approved");
        self.managed_response(membership).await
    }

    /// Change a member's role (owner only)
    #[instrument(skip(self, request))]
    pub async fn set_member_role(
        &self,
        club_id: Snowflake,
        actor_id: Snowflake,
        user_id: Snowflake,
        request: UpdateMemberRoleRequest,
    ) -> ServiceResult<MemberResponse> {
        let role: MembershipRole = request.role.parse()?;
        let membership = self
            .ctx
            .membership_repo()
            .update(club_id, actor_id, user_id, MembershipChange::SetRole(role))
            .await?;

        info!(club_id = %club_id, user_id = %user_id, role = %role, "Member role changed");
        self.managed_response(membership).await
    }

    /// Remove a member (owner only); the owner cannot be kicked
    #[instrument(skip(self))]
    pub async fn kick_member(
        &self,
        club_id: Snowflake,
        actor_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        self.ctx
            .membership_repo()
            .delete(club_id, actor_id, user_id)
            .await?;

        info!(club_id = %club_id, user_id = %user_id, "Member kicked");
        Ok(())
    }

    /// Leave a club
    ///
    /// The body is only consulted when the caller owns the club, in which case
    /// it must say whether to transfer ownership or close the club.
    #[instrument(skip(self, body))]
    pub async fn leave_club(
        &self,
        club_id: Snowflake,
        user_id: Snowflake,
        body: Option<LeaveClubRequest>,
    ) -> ServiceResult<LeaveResponse> {
        let mut request = LeaveRequest::new(club_id, user_id);
        if let Some(body) = body {
            request = request.with_disposition(DispositionRequest::from(body));
        }

        let outcome = self.ctx.club_repo().leave(&request).await?;

        info!(?outcome, "Left club");
        Ok(LeaveResponse::from(outcome))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Private clubs are visible to their members, pending ones included
    pub(crate) async fn require_visible(&self, club: &Club, viewer_id: Snowflake) -> ServiceResult<()> {
        if !club.is_private || club.is_owner(viewer_id) {
            return Ok(());
        }
        match self.ctx.membership_repo().find(club.id, viewer_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::PrivateClub.into()),
        }
    }

    async fn find_club(&self, club_id: Snowflake) -> ServiceResult<Club> {
        self.ctx
            .club_repo()
            .find_by_id(club_id)
            .await?
            .ok_or_else(|| DomainError::ClubNotFound(club_id).into())
    }

    async fn find_membership(
        &self,
        club_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<ClubMembership> {
        self.ctx
            .membership_repo()
            .find(club_id, user_id)
            .await?
            .ok_or_else(|| DomainError::MembershipNotFound.into())
    }

    /// Response for a row just written by an owner-side edit
    async fn managed_response(&self, membership: ClubMembership) -> ServiceResult<MemberResponse> {
        let club = self.find_club(membership.club_id).await?;
        self.to_response(membership, &club).await
    }

    async fn to_response(&self, membership: ClubMembership, club: &Club) -> ServiceResult<MemberResponse> {
        let user = self.ctx.user_repo().find_by_id(membership.user_id).await?;
        Ok(MemberResponse::from(MemberWithUser {
            membership,
            club,
            user,
        }))
    }
}
