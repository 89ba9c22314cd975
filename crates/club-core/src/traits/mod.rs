//! Repository traits (ports)

mod repositories;

pub use repositories::{
    ClubQuery, ClubRepository, MembershipRepository, RepoResult, UserRepository,
};
