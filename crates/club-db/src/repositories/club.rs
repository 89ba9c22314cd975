//! PostgreSQL implementation of ClubRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use club_core::entities::{Club, ClubMembership};
use club_core::error::DomainError;
use club_core::leave::{plan_leave, LeaveOutcome, LeaveRequest};
use club_core::traits::{ClubQuery, ClubRepository, RepoResult};
use club_core::value_objects::Snowflake;

use crate::models::ClubModel;

use super::error::{constraint_violation, map_db_error, map_unique_violation};
use super::tx;

const NAME_KEY: &str = "clubs_name_key";
const MAX_PAGE: i64 = 100;

/// PostgreSQL implementation of ClubRepository
#[derive(Clone)]
pub struct PgClubRepository {
    pool: PgPool,
}

impl PgClubRepository {
    /// Create a new PgClubRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn club_unique_violation(constraint: Option<&str>) -> DomainError {
    match constraint {
        Some(NAME_KEY) => DomainError::ClubNameTaken,
        other => constraint_violation(other),
    }
}

async fn insert_founder(conn: &mut PgConnection, founder: &ClubMembership) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO club_memberships (id, club_id, user_id, role, is_approved, joined_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ",
    )
    .bind(founder.id.into_inner())
    .bind(founder.club_id.into_inner())
    .bind(founder.user_id.into_inner())
    .bind(founder.role.as_str())
    .bind(founder.is_approved)
    .bind(founder.joined_at)
    .bind(founder.updated_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_unique_violation(e, constraint_violation))?;

    Ok(())
}

#[async_trait]
impl ClubRepository for PgClubRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Club>> {
        let sql = format!(
            "SELECT {} FROM clubs WHERE id = $1 AND deleted_at IS NULL",
            ClubModel::COLUMNS
        );
        let result = sqlx::query_as::<_, ClubModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Club::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &ClubQuery) -> RepoResult<Vec<Club>> {
        let sql = format!(
            r"
            SELECT {} FROM clubs
            WHERE deleted_at IS NULL
              AND is_private = FALSE
              AND ($1::text IS NULL OR lower(genre) = lower($1))
              AND ($2::text IS NULL OR location ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            ",
            ClubModel::COLUMNS
        );
        let result = sqlx::query_as::<_, ClubModel>(&sql)
            .bind(query.genre.as_deref())
            .bind(query.location.as_deref())
            .bind(query.limit.clamp(1, MAX_PAGE))
            .bind(query.offset.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.into_iter().map(Club::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Club>> {
        let sql = format!(
            r"
            SELECT {} FROM clubs c
            WHERE c.deleted_at IS NULL
              AND EXISTS (
                  SELECT 1 FROM club_memberships m
                  WHERE m.club_id = c.id AND m.user_id = $1
              )
            ORDER BY c.name
            ",
            ClubModel::qualified_columns("c")
        );
        let result = sqlx::query_as::<_, ClubModel>(&sql)
            .bind(user_id.into_inner())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.into_iter().map(Club::from).collect())
    }

    #[instrument(skip(self, club, founder), fields(club_id = %club.id))]
    async fn create(&self, club: &Club, founder: &ClubMembership) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO clubs (id, name, description, location, genre, is_private, max_members,
                               members_count, owner_id, average_rating, ratings_count, tags,
                               current_book, next_meeting, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8, $9, $10, $11, $12, $13, $14, $15)
            ",
        )
        .bind(club.id.into_inner())
        .bind(&club.name)
        .bind(&club.description)
        .bind(&club.location)
        .bind(&club.genre)
        .bind(club.is_private)
        .bind(club.max_members)
        .bind(club.owner_id.map(Snowflake::into_inner))
        .bind(club.average_rating)
        .bind(club.ratings_count)
        .bind(&club.tags)
        .bind(club.current_book.as_ref().map(Json))
        .bind(club.next_meeting.as_ref().map(Json))
        .bind(club.created_at)
        .bind(club.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, club_unique_violation))?;

        insert_founder(&mut tx, founder).await?;
        let members_count = tx::recount_members(&mut tx, club.id).await?;

        tx.commit().await.map_err(map_db_error)?;

        info!(club_id = %club.id, members_count, "Club created");
        Ok(())
    }

    #[instrument(skip(self, club), fields(club_id = %club.id))]
    async fn update(&self, club: &Club, actor_id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        tx::lock_club(&mut tx, club.id).await?.ensure_owner(actor_id)?;

        sqlx::query(
            r"
            UPDATE clubs
            SET name = $2, description = $3, location = $4, genre = $5, is_private = $6,
                max_members = $7, tags = $8, current_book = $9, next_meeting = $10,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(club.id.into_inner())
        .bind(&club.name)
        .bind(&club.description)
        .bind(&club.location)
        .bind(&club.genre)
        .bind(club.is_private)
        .bind(club.max_members)
        .bind(&club.tags)
        .bind(club.current_book.as_ref().map(Json))
        .bind(club.next_meeting.as_ref().map(Json))
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, club_unique_violation))?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake, actor_id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        tx::lock_club(&mut tx, id).await?.ensure_owner(actor_id)?;
        tx::close_club(&mut tx, id).await?;

        tx.commit().await.map_err(map_db_error)?;

        info!(club_id = %id, %actor_id, "Club deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(club_id = %request.club_id, user_id = %request.user_id))]
    async fn leave(&self, request: &LeaveRequest) -> RepoResult<LeaveOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let club = tx::lock_club(&mut tx, request.club_id).await?;
        let members = tx::load_memberships(&mut tx, club.id).await?;

        // Rejections drop `tx`, rolling back before anything was written.
        let plan = plan_leave(&club, &members, request)?;
        let outcome = tx::apply_leave_plan(&mut tx, plan).await?;

        tx.commit().await.map_err(map_db_error)?;

        info!(?outcome, "Member left club");
        Ok(outcome)
    }
}
