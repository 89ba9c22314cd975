//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
///
/// Every variant maps to a distinct, stable [`code`](DomainError::code) so
/// callers never have to match on message text.
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Club not found: {0}")]
    ClubNotFound(Snowflake),

    #[error("Membership not found")]
    MembershipNotFound,

    // =========================================================================
    // Leave Protocol Rejections
    // =========================================================================
    #[error("User is not a member of this club")]
    NotAMember,

    #[error("Owner must choose action: transfer or close")]
    OwnerDispositionRequired,

    #[error("new_owner_id is required to transfer ownership")]
    NewOwnerRequired,

    #[error("New owner must be different from the current owner")]
    SameOwner,

    #[error("New owner {0} is not a member of this club")]
    NewOwnerNotAMember(Snowflake),

    #[error("New owner {0} has not been approved")]
    NewOwnerNotApproved(Snowflake),

    #[error("Invalid action: {0} (expected transfer or close)")]
    InvalidDisposition(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only the club owner can do this")]
    NotClubOwner,

    #[error("This club is private")]
    PrivateClub,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Club name already taken")]
    ClubNameTaken,

    #[error("Already a member of this club")]
    AlreadyMember,

    #[error("Club has reached its member limit")]
    ClubFull,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Cannot remove the club owner")]
    CannotKickOwner,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ClubNotFound(_) => "UNKNOWN_CLUB",
            Self::MembershipNotFound => "UNKNOWN_MEMBERSHIP",

            // Leave protocol
            Self::NotAMember => "NOT_A_MEMBER",
            Self::OwnerDispositionRequired => "OWNER_DISPOSITION_REQUIRED",
            Self::NewOwnerRequired => "NEW_OWNER_REQUIRED",
            Self::SameOwner => "SAME_OWNER",
            Self::NewOwnerNotAMember(_) => "NEW_OWNER_NOT_A_MEMBER",
            Self::NewOwnerNotApproved(_) => "NEW_OWNER_NOT_APPROVED",
            Self::InvalidDisposition(_) => "INVALID_DISPOSITION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::InvalidRole(_) => "INVALID_ROLE",

            // Authorization
            Self::NotClubOwner => "NOT_CLUB_OWNER",
            Self::PrivateClub => "PRIVATE_CLUB",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::ClubNameTaken => "CLUB_NAME_TAKEN",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::ClubFull => "CLUB_FULL",

            // Business Rules
            Self::CannotKickOwner => "CANNOT_KICK_OWNER",

            // Infrastructure
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::ClubNotFound(_) | Self::MembershipNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidUsername(_)
                | Self::WeakPassword(_)
                | Self::InvalidRole(_)
                | Self::CannotKickOwner
        )
    }

    /// Check if this is a rejection produced by the leave protocol.
    ///
    /// These are caller-input errors and are reported verbatim.
    pub fn is_leave_rejection(&self) -> bool {
        matches!(
            self,
            Self::NotAMember
                | Self::OwnerDispositionRequired
                | Self::NewOwnerRequired
                | Self::SameOwner
                | Self::NewOwnerNotAMember(_)
                | Self::NewOwnerNotApproved(_)
                | Self::InvalidDisposition(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotClubOwner | Self::PrivateClub)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists
                | Self::UsernameTaken
                | Self::ClubNameTaken
                | Self::AlreadyMember
                | Self::ClubFull
        )
    }

    /// Check if this is an infrastructure fault whose message must not leak
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::ConstraintViolation(_)
                | Self::DatabaseError(_)
                | Self::CacheError(_)
                | Self::InternalError(_)
        )
    }
}
