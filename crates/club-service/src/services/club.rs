//! Club service
//!
//! Club creation, browsing, and owner-only edits and deletion.

use club_core::entities::{Club, ClubMembership};
use club_core::{ClubQuery, DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{ClubFilter, ClubResponse, CreateClubRequest, PageResponse, UpdateClubRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::membership::MembershipService;

/// Club service
pub struct ClubService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ClubService<'a> {
    /// Create a new ClubService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a club owned by `owner_id`, who becomes its first member
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_club(
        &self,
        owner_id: Snowflake,
        request: CreateClubRequest,
    ) -> ServiceResult<ClubResponse> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::validation("Club name must not be blank"));
        }

        let mut club = Club::new(self.ctx.generate_id(), name, owner_id);
        club.description = request.description;
        club.location = request.location;
        club.genre = request.genre;
        club.is_private = request.is_private;
        club.max_members = request.max_members;
        club.set_tags(request.tags);
        club.members_count = 1;

        let founder = ClubMembership::founder(self.ctx.generate_id(), club.id, owner_id);
        self.ctx.club_repo().create(&club, &founder).await?;

        info!(club_id = %club.id, owner_id = %owner_id, "Club created");

        Ok(ClubResponse::from(club))
    }

    /// Browse public clubs
    #[instrument(skip(self))]
    pub async fn list_clubs(
        &self,
        filter: ClubFilter,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<PageResponse<ClubResponse>> {
        let query = ClubQuery {
            genre: non_blank(filter.genre),
            location: non_blank(filter.location),
            limit,
            offset,
        };

        let clubs = self.ctx.club_repo().list(&query).await?;

        Ok(PageResponse::new(
            clubs.into_iter().map(ClubResponse::from).collect(),
            limit,
            offset,
        ))
    }

    /// Get a club; private clubs are visible to members only
    #[instrument(skip(self))]
    pub async fn get_club(&self, club_id: Snowflake, viewer_id: Snowflake) -> ServiceResult<ClubResponse> {
        let club = self.find_club(club_id).await?;
        MembershipService::new(self.ctx)
            .require_visible(&club, viewer_id)
            .await?;
        Ok(ClubResponse::from(club))
    }

    /// Update descriptive fields (owner only)
    #[instrument(skip(self, request))]
    pub async fn update_club(
        &self,
        club_id: Snowflake,
        actor_id: Snowflake,
        request: UpdateClubRequest,
    ) -> ServiceResult<ClubResponse> {
        let mut club = self.find_club(club_id).await?;
        club.ensure_owner(actor_id)?;

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ServiceError::validation("Club name must not be blank"));
            }
            club.set_name(name);
        }
        if let Some(description) = request.description {
            club.description = Some(description);
        }
        if let Some(location) = request.location {
            club.location = Some(location);
        }
        if let Some(genre) = request.genre {
            club.genre = Some(genre);
        }
        if let Some(is_private) = request.is_private {
            club.is_private = is_private;
        }
        if let Some(max_members) = request.max_members {
            club.max_members = Some(max_members);
        }
        if let Some(tags) = request.tags {
            club.set_tags(tags);
        }
        if let Some(current_book) = request.current_book {
            club.current_book = Some(current_book);
        }
        if let Some(next_meeting) = request.next_meeting {
            club.next_meeting = Some(next_meeting);
        }

        self.ctx.club_repo().update(&club, actor_id).await?;

        info!(club_id = %club_id, "Club updated");

        // Re-read so members_count reflects any concurrent joins
        let club = self.find_club(club_id).await?;
        Ok(ClubResponse::from(club))
    }

    /// Delete a club (owner only); same effect as leaving with `close`
    #[instrument(skip(self))]
    pub async fn delete_club(&self, club_id: Snowflake, actor_id: Snowflake) -> ServiceResult<()> {
        self.ctx.club_repo().delete(club_id, actor_id).await?;

        info!(club_id = %club_id, "Club deleted");
        Ok(())
    }

    async fn find_club(&self, club_id: Snowflake) -> ServiceResult<Club> {
        self.ctx
            .club_repo()
            .find_by_id(club_id)
            .await?
            .ok_or_else(|| DomainError::ClubNotFound(club_id).into())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
