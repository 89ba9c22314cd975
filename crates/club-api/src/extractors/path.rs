//! Path parameter extractors
//!
//! Snowflake IDs arrive as strings and are parsed per handler so a bad ID
//! reports which parameter was wrong.

use club_core::Snowflake;
use serde::Deserialize;

use crate::response::ApiError;

fn parse_id(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// Path parameters with club_id
#[derive(Debug, Deserialize)]
pub struct ClubIdPath {
    pub club_id: String,
}

impl ClubIdPath {
    /// Parse club_id as Snowflake
    pub fn club_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.club_id, "club_id")
    }
}

/// Path parameters with user_id
#[derive(Debug, Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

impl UserIdPath {
    /// Parse user_id as Snowflake
    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.user_id, "user_id")
    }
}

/// Path parameters with club_id and user_id
#[derive(Debug, Deserialize)]
pub struct ClubUserPath {
    pub club_id: String,
    pub user_id: String,
}

impl ClubUserPath {
    /// Parse club_id as Snowflake
    pub fn club_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.club_id, "club_id")
    }

    /// Parse user_id as Snowflake
    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.user_id, "user_id")
    }
}
