//! Domain entities - core business objects

mod club;
mod membership;
mod user;

pub use club::Club;
pub use membership::{ClubMembership, MembershipChange, MembershipRole};
pub use user::User;
