//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every method that changes the set of
//! membership rows of a club also recomputes `Club::members_count` before it
//! returns, inside the same transaction.

use async_trait::async_trait;

use crate::entities::{Club, ClubMembership, MembershipChange, User};
use crate::error::DomainError;
use crate::leave::{LeaveOutcome, LeaveRequest};
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Check if username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Update profile fields
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;
}

// ============================================================================
// Club Repository
// ============================================================================

/// Filters for browsing public clubs
#[derive(Debug, Clone, Default)]
pub struct ClubQuery {
    pub genre: Option<String>,
    pub location: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait ClubRepository: Send + Sync {
    /// Find a live (not closed) club by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Club>>;

    /// List public clubs, newest first
    async fn list(&self, query: &ClubQuery) -> RepoResult<Vec<Club>>;

    /// List clubs a user holds a membership row in
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Club>>;

    /// Create a club together with its founder's membership
    async fn create(&self, club: &Club, founder: &ClubMembership) -> RepoResult<()>;

    /// Update descriptive fields on behalf of `actor_id`. Never touches
    /// `owner_id` or `members_count`.
    ///
    /// Ownership is checked under the club's row lock (`NotClubOwner`).
    async fn update(&self, club: &Club, actor_id: Snowflake) -> RepoResult<()>;

    /// Soft delete a club and remove all of its memberships.
    ///
    /// Only the owner at the time the row lock is taken may do this
    /// (`NotClubOwner`).
    async fn delete(&self, id: Snowflake, actor_id: Snowflake) -> RepoResult<()>;

    /// Run the leave protocol atomically under the club's row lock
    async fn leave(&self, request: &LeaveRequest) -> RepoResult<LeaveOutcome>;
}

// ============================================================================
// Membership Repository
// ============================================================================

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Get one membership by natural key
    async fn find(&self, club_id: Snowflake, user_id: Snowflake)
        -> RepoResult<Option<ClubMembership>>;

    /// List memberships of a club ordered by `joined_at`
    async fn find_by_club(&self, club_id: Snowflake) -> RepoResult<Vec<ClubMembership>>;

    /// List memberships held by a user
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<ClubMembership>>;

    /// Add a membership for a joining user.
    ///
    /// Fails with `ClubNotFound`, `AlreadyMember` or `ClubFull`. Returns the
    /// recounted `members_count`.
    async fn join(&self, membership: &ClubMembership) -> RepoResult<i32>;

    /// Edit an existing membership on behalf of the club owner and return the
    /// row as stored.
    ///
    /// Checked under the club's row lock: `ClubNotFound`, then `NotClubOwner`
    /// for `actor_id`, then `MembershipNotFound`. Never creates a row.
    async fn update(
        &self,
        club_id: Snowflake,
        actor_id: Snowflake,
        user_id: Snowflake,
        change: MembershipChange,
    ) -> RepoResult<ClubMembership>;

    /// Remove a member on behalf of the club owner.
    ///
    /// Checked under the club's row lock: `ClubNotFound`, `NotClubOwner` for
    /// `actor_id`, `CannotKickOwner` when the target owns the club, and
    /// `MembershipNotFound` when no row exists.
    async fn delete(
        &self,
        club_id: Snowflake,
        actor_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<()>;
}
