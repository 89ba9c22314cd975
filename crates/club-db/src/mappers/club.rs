//! Club model → entity mapper

use club_core::entities::Club;
use club_core::value_objects::Snowflake;

use crate::models::ClubModel;

impl From<ClubModel> for Club {
    fn from(model: ClubModel) -> Self {
        Club {
            id: Snowflake::new(model.id),
            name: model.name,
            description: model.description,
            location: model.location,
            genre: model.genre,
            is_private: model.is_private,
            max_members: model.max_members,
            members_count: model.members_count,
            owner_id: model.owner_id.map(Snowflake::new),
            average_rating: model.average_rating,
            ratings_count: model.ratings_count,
            tags: model.tags,
            current_book: model.current_book.map(|json| json.0),
            next_meeting: model.next_meeting.map(|json| json.0),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
