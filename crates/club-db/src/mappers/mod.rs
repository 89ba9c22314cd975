//! Model → entity mappers
//!
//! Conversions from database rows to `club-core` entities. Rows whose
//! contents violate a domain rule (an unknown role string) fail the
//! conversion instead of being silently coerced.

mod club;
mod membership;
mod user;

pub use membership::memberships_from_models;
