//! Database models - SQLx-compatible structs for PostgreSQL tables

mod club;
mod membership;
mod user;

pub use club::ClubModel;
pub use membership::MembershipModel;
pub use user::UserModel;
