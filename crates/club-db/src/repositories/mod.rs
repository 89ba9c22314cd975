//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in club-core.

mod club;
mod error;
mod membership;
mod tx;
mod user;

pub use club::PgClubRepository;
pub use membership::PgMembershipRepository;
pub use user::PgUserRepository;
