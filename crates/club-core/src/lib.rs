//! # club-core
//!
//! Domain layer containing entities, value objects, repository traits, and the
//! club leave protocol. This crate has zero dependencies on infrastructure
//! (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod leave;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Club, ClubMembership, MembershipChange, MembershipRole, User};
pub use error::DomainError;
pub use leave::{plan_leave, DispositionRequest, LeaveDisposition, LeaveOutcome, LeavePlan, LeaveRequest};
pub use traits::{
    ClubQuery, ClubRepository, MembershipRepository, RepoResult, UserRepository,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
