//! Statements that run inside a caller-owned transaction
//!
//! Every path that changes a club's membership rows or `owner_id` first takes
//! the club's row lock with [`lock_club`], so these helpers never race with
//! each other on the same club.

use sqlx::PgConnection;

use club_core::entities::{Club, ClubMembership};
use club_core::error::DomainError;
use club_core::leave::{LeaveOutcome, LeavePlan};
use club_core::traits::RepoResult;
use club_core::value_objects::Snowflake;

use crate::mappers::memberships_from_models;
use crate::models::{ClubModel, MembershipModel};

use super::error::map_db_error;

/// Lock a live club row for the rest of the transaction
pub async fn lock_club(conn: &mut PgConnection, club_id: Snowflake) -> RepoResult<Club> {
    let sql = format!(
        "SELECT {} FROM clubs WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        ClubModel::COLUMNS
    );
    sqlx::query_as::<_, ClubModel>(&sql)
        .bind(club_id.into_inner())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?
        .map(Club::from)
        .ok_or(DomainError::ClubNotFound(club_id))
}

/// All memberships of a club, oldest first
pub async fn load_memberships(
    conn: &mut PgConnection,
    club_id: Snowflake,
) -> RepoResult<Vec<ClubMembership>> {
    let rows = sqlx::query_as::<_, MembershipModel>(
        r"
        SELECT id, club_id, user_id, role, is_approved, joined_at, updated_at
        FROM club_memberships
        WHERE club_id = $1
        ORDER BY joined_at, id
        ",
    )
    .bind(club_id.into_inner())
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_error)?;

    memberships_from_models(rows)
}

/// One membership row, locked until the transaction ends
pub async fn find_membership(
    conn: &mut PgConnection,
    club_id: Snowflake,
    user_id: Snowflake,
) -> RepoResult<Option<ClubMembership>> {
    sqlx::query_as::<_, MembershipModel>(
        r"
        SELECT id, club_id, user_id, role, is_approved, joined_at, updated_at
        FROM club_memberships
        WHERE club_id = $1 AND user_id = $2
        FOR UPDATE
        ",
    )
    .bind(club_id.into_inner())
    .bind(user_id.into_inner())
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_db_error)?
    .map(ClubMembership::try_from)
    .transpose()
}

/// Recompute `members_count` from the membership rows and return it
pub async fn recount_members(conn: &mut PgConnection, club_id: Snowflake) -> RepoResult<i32> {
    sqlx::query_scalar::<_, i32>(
        r"
        UPDATE clubs
        SET members_count = (SELECT COUNT(*) FROM club_memberships WHERE club_id = $1)
        WHERE id = $1
        RETURNING members_count
        ",
    )
    .bind(club_id.into_inner())
    .fetch_one(&mut *conn)
    .await
    .map_err(map_db_error)
}

/// Point `owner_id` at another user, or clear it
pub async fn set_owner(
    conn: &mut PgConnection,
    club_id: Snowflake,
    owner_id: Option<Snowflake>,
) -> RepoResult<()> {
    let result = sqlx::query(
        r"
        UPDATE clubs
        SET owner_id = $2, updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        ",
    )
    .bind(club_id.into_inner())
    .bind(owner_id.map(Snowflake::into_inner))
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(DomainError::ClubNotFound(club_id));
    }
    Ok(())
}

/// Delete one membership row; `false` if there was none
pub async fn delete_membership(
    conn: &mut PgConnection,
    club_id: Snowflake,
    user_id: Snowflake,
) -> RepoResult<bool> {
    let result = sqlx::query(
        r"
        DELETE FROM club_memberships
        WHERE club_id = $1 AND user_id = $2
        ",
    )
    .bind(club_id.into_inner())
    .bind(user_id.into_inner())
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(result.rows_affected() > 0)
}

/// Soft delete a club and remove every membership row
pub async fn close_club(conn: &mut PgConnection, club_id: Snowflake) -> RepoResult<()> {
    sqlx::query("DELETE FROM club_memberships WHERE club_id = $1")
        .bind(club_id.into_inner())
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;

    let result = sqlx::query(
        r"
        UPDATE clubs
        SET deleted_at = NOW(), updated_at = NOW(), members_count = 0
        WHERE id = $1 AND deleted_at IS NULL
        ",
    )
    .bind(club_id.into_inner())
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(DomainError::ClubNotFound(club_id));
    }
    Ok(())
}

/// Apply a validated leave plan
pub async fn apply_leave_plan(conn: &mut PgConnection, plan: LeavePlan) -> RepoResult<LeaveOutcome> {
    match plan {
        LeavePlan::RemoveMember { club_id, user_id } => {
            if !delete_membership(conn, club_id, user_id).await? {
                return Err(DomainError::NotAMember);
            }
        }
        LeavePlan::Transfer {
            club_id,
            previous_owner_id,
            new_owner_id,
        } => {
            set_owner(conn, club_id, Some(new_owner_id)).await?;
            if !delete_membership(conn, club_id, previous_owner_id).await? {
                return Err(DomainError::NotAMember);
            }
        }
        LeavePlan::Close { club_id } => {
            close_club(conn, club_id).await?;
            return Ok(plan.into_outcome(0));
        }
    }

    let members_count = recount_members(conn, plan.club_id()).await?;
    Ok(plan.into_outcome(members_count))
}
