//! Club database model

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

/// Database model for clubs table
#[derive(Debug, Clone, FromRow)]
pub struct ClubModel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub genre: Option<String>,
    pub is_private: bool,
    pub max_members: Option<i32>,
    pub members_count: i32,
    pub owner_id: Option<i64>,
    pub average_rating: f64,
    pub ratings_count: i32,
    pub tags: Vec<String>,
    pub current_book: Option<Json<Value>>,
    pub next_meeting: Option<Json<Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ClubModel {
    /// Column list shared by every club query
    pub const COLUMNS: &'static str = "id, name, description, location, genre, is_private, \
        max_members, members_count, owner_id, average_rating, ratings_count, tags, \
        current_book, next_meeting, created_at, updated_at, deleted_at";

    /// Column list prefixed with a table alias, for joins
    pub fn qualified_columns(alias: &str) -> String {
        Self::COLUMNS
            .split(',')
            .map(|column| format!("{alias}.{}", column.trim()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
