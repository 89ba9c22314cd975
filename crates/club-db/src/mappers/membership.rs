//! Membership model → entity mapper

use club_core::entities::{ClubMembership, MembershipRole};
use club_core::error::DomainError;
use club_core::value_objects::Snowflake;

use crate::models::MembershipModel;

impl TryFrom<MembershipModel> for ClubMembership {
    type Error = DomainError;

    fn try_from(model: MembershipModel) -> Result<Self, Self::Error> {
        let role: MembershipRole = model.role.parse().map_err(|_| {
            DomainError::DatabaseError(format!(
                "membership {} has unknown role {:?}",
                model.id, model.role
            ))
        })?;

        Ok(ClubMembership {
            id: Snowflake::new(model.id),
            club_id: Snowflake::new(model.club_id),
            user_id: Snowflake::new(model.user_id),
            role,
            is_approved: model.is_approved,
            joined_at: model.joined_at,
            updated_at: model.updated_at,
        })
    }
}

/// Convert a batch of rows, failing on the first bad one
pub fn memberships_from_models(
    models: Vec<MembershipModel>,
) -> Result<Vec<ClubMembership>, DomainError> {
    models.into_iter().map(ClubMembership::try_from).collect()
}
