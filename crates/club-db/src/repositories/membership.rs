//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use club_core::entities::{ClubMembership, MembershipChange};
use club_core::error::DomainError;
use club_core::traits::{MembershipRepository, RepoResult};
use club_core::value_objects::Snowflake;

use crate::mappers::memberships_from_models;
use crate::models::MembershipModel;

use super::error::{map_db_error, map_unique_violation};
use super::tx;

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new PgMembershipRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        club_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ClubMembership>> {
        let result = sqlx::query_as::<_, MembershipModel>(
            r"
            SELECT id, club_id, user_id, role, is_approved, joined_at, updated_at
            FROM club_memberships
            WHERE club_id = $1 AND user_id = $2
            ",
        )
        .bind(club_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ClubMembership::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_club(&self, club_id: Snowflake) -> RepoResult<Vec<ClubMembership>> {
        let result = sqlx::query_as::<_, MembershipModel>(
            r"
            SELECT id, club_id, user_id, role, is_approved, joined_at, updated_at
            FROM club_memberships
            WHERE club_id = $1
            ORDER BY joined_at, id
            ",
        )
        .bind(club_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        memberships_from_models(result)
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<ClubMembership>> {
        let result = sqlx::query_as::<_, MembershipModel>(
            r"
            SELECT id, club_id, user_id, role, is_approved, joined_at, updated_at
            FROM club_memberships
            WHERE user_id = $1
            ORDER BY joined_at, id
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        memberships_from_models(result)
    }

    #[instrument(skip(self, membership), fields(club_id = %membership.club_id, user_id = %membership.user_id))]
    async fn join(&self, membership: &ClubMembership) -> RepoResult<i32> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let club = tx::lock_club(&mut tx, membership.club_id).await?;

        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM club_memberships WHERE club_id = $1 AND user_id = $2)
            ",
        )
        .bind(membership.club_id.into_inner())
        .bind(membership.user_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if exists {
            return Err(DomainError::AlreadyMember);
        }
        if club.is_full() {
            return Err(DomainError::ClubFull);
        }

        sqlx::query(
            r"
            INSERT INTO club_memberships (id, club_id, user_id, role, is_approved, joined_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(membership.id.into_inner())
        .bind(membership.club_id.into_inner())
        .bind(membership.user_id.into_inner())
        .bind(membership.role.as_str())
        .bind(membership.is_approved)
        .bind(membership.joined_at)
        .bind(membership.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, |_| DomainError::AlreadyMember))?;

        let members_count = tx::recount_members(&mut tx, membership.club_id).await?;
        tx.commit().await.map_err(map_db_error)?;

        info!(members_count, approved = membership.is_approved, "Member joined club");
        Ok(members_count)
    }

    #[instrument(skip(self))]
    async fn update(
        &self,
        club_id: Snowflake,
        actor_id: Snowflake,
        user_id: Snowflake,
        change: MembershipChange,
    ) -> RepoResult<ClubMembership> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        tx::lock_club(&mut tx, club_id).await?.ensure_owner(actor_id)?;

        let mut membership = tx::find_membership(&mut tx, club_id, user_id)
            .await?
            .ok_or(DomainError::MembershipNotFound)?;

        if change.apply(&mut membership) {
            let result = sqlx::query(
                r"
                UPDATE club_memberships
                SET role = $3, is_approved = $4, updated_at = $5
                WHERE club_id = $1 AND user_id = $2
                ",
            )
            .bind(club_id.into_inner())
            .bind(user_id.into_inner())
            .bind(membership.role.as_str())
            .bind(membership.is_approved)
            .bind(membership.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(DomainError::MembershipNotFound);
            }
        }

        tx.commit().await.map_err(map_db_error)?;

        info!(?change, "Membership updated");
        Ok(membership)
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        club_id: Snowflake,
        actor_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let club = tx::lock_club(&mut tx, club_id).await?;
        club.ensure_owner(actor_id)?;
        if club.is_owner(user_id) {
            return Err(DomainError::CannotKickOwner);
        }

        if !tx::delete_membership(&mut tx, club_id, user_id).await? {
            return Err(DomainError::MembershipNotFound);
        }

        let members_count = tx::recount_members(&mut tx, club_id).await?;
        tx.commit().await.map_err(map_db_error)?;

        info!(%club_id, %user_id, members_count, "Membership removed");
        Ok(())
    }
}
