//! Club entity - a reading group that users join

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Club entity
///
/// Ownership is tracked solely through `owner_id`; the owner's membership row
/// carries an ordinary role. `members_count` is a denormalized copy of the
/// number of membership rows and is only ever recomputed by the repository
/// inside the transaction that changes membership.
#[derive(Debug, Clone, PartialEq)]
pub struct Club {
    pub id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub genre: Option<String>,
    pub is_private: bool,
    pub max_members: Option<i32>,
    pub members_count: i32,
    pub owner_id: Option<Snowflake>,
    pub average_rating: f64,
    pub ratings_count: i32,
    pub tags: Vec<String>,
    /// Opaque payload describing the book currently being read
    pub current_book: Option<Value>,
    /// Opaque payload describing the next meeting
    pub next_meeting: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Club {
    /// Create a new club owned by `owner_id`
    pub fn new(id: Snowflake, name: String, owner_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description: None,
            location: None,
            genre: None,
            is_private: false,
            max_members: None,
            members_count: 0,
            owner_id: Some(owner_id),
            average_rating: 0.0,
            ratings_count: 0,
            tags: Vec::new(),
            current_book: None,
            next_meeting: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if a user is the club owner
    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == Some(user_id)
    }

    /// Fail with `NotClubOwner` unless `actor_id` owns the club
    pub fn ensure_owner(&self, actor_id: Snowflake) -> Result<(), DomainError> {
        if self.is_owner(actor_id) {
            Ok(())
        } else {
            Err(DomainError::NotClubOwner)
        }
    }

    /// Whether a new member would exceed `max_members`
    pub fn is_full(&self) -> bool {
        self.max_members
            .is_some_and(|max| self.members_count >= max)
    }

    /// New memberships start approved unless the club is private
    #[inline]
    pub fn auto_approves(&self) -> bool {
        !self.is_private
    }

    pub fn transfer_ownership(&mut self, new_owner_id: Snowflake) {
        self.owner_id = Some(new_owner_id);
        self.updated_at = Utc::now();
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Replace tags, dropping blanks and duplicates while keeping order
    pub fn set_tags(&mut self, tags: Vec<String>) {
        let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() && !cleaned.contains(&tag) {
                cleaned.push(tag);
            }
        }
        self.tags = cleaned;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn club() -> Club {
        Club::new(Snowflake::new(1), "Dune Readers".to_string(), Snowflake::new(100))
    }

    #[test]
    fn test_club_creation() {
        let club = club();
        assert!(club.is_owner(Snowflake::new(100)));
        assert!(!club.is_owner(Snowflake::new(200)));
        assert!(club.ensure_owner(Snowflake::new(100)).is_ok());
        assert!(matches!(
            club.ensure_owner(Snowflake::new(200)),
            Err(DomainError::NotClubOwner)
        ));
        assert!(club.auto_approves());
        assert_eq!(club.members_count, 0);
    }

    #[test]
    fn test_ownerless_club_has_no_owner() {
        let mut club = club();
        club.owner_id = None;
        assert!(!club.is_owner(Snowflake::new(100)));
    }

    #[test]
    fn test_is_full() {
        let mut club = club();
        assert!(!club.is_full());

        club.max_members = Some(2);
        club.members_count = 1;
        assert!(!club.is_full());

        club.members_count = 2;
        assert!(club.is_full());
    }

    #[test]
    fn test_transfer_ownership() {
        let mut club = club();
        club.transfer_ownership(Snowflake::new(200));
        assert!(club.is_owner(Snowflake::new(200)));
        assert!(!club.is_owner(Snowflake::new(100)));
    }

    #[test]
    fn test_set_tags_normalizes() {
        let mut club = club();
        club.set_tags(vec![
            " Sci-Fi ".to_string(),
            "sci-fi".to_string(),
            String::new(),
            "Classics".to_string(),
        ]);
        assert_eq!(club.tags, vec!["sci-fi", "classics"]);
    }
}
