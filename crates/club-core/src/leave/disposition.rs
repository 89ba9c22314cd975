use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// What the owner wants done with the club when they leave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveDisposition {
    /// Hand ownership to another approved member
    Transfer { new_owner_id: Snowflake },
    /// Soft-delete the club and drop every membership
    Close,
}

impl LeaveDisposition {
    pub const TRANSFER: &'static str = "transfer";
    pub const CLOSE: &'static str = "close";
}

/// Disposition as supplied by a caller, before validation.
///
/// Only the owner's leave consults this, so a malformed request from a regular
/// member never produces an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispositionRequest {
    pub action: Option<String>,
    pub new_owner_id: Option<Snowflake>,
}

impl DispositionRequest {
    pub fn transfer(new_owner_id: Snowflake) -> Self {
        Self {
            action: Some(LeaveDisposition::TRANSFER.to_string()),
            new_owner_id: Some(new_owner_id),
        }
    }

    pub fn close() -> Self {
        Self {
            action: Some(LeaveDisposition::CLOSE.to_string()),
            new_owner_id: None,
        }
    }

    /// Turn the raw request into a disposition.
    ///
    /// A missing or blank action means the owner chose nothing. A zero
    /// `new_owner_id` counts as absent.
    pub fn resolve(&self) -> Result<LeaveDisposition, DomainError> {
        let action = self
            .action
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or(DomainError::OwnerDispositionRequired)?;

        match action {
            LeaveDisposition::TRANSFER => {
                let new_owner_id = self
                    .new_owner_id
                    .filter(|id| !id.is_zero())
                    .ok_or(DomainError::NewOwnerRequired)?;
                Ok(LeaveDisposition::Transfer { new_owner_id })
            }
            LeaveDisposition::CLOSE => Ok(LeaveDisposition::Close),
            other => Err(DomainError::InvalidDisposition(other.to_string())),
        }
    }
}

impl From<LeaveDisposition> for DispositionRequest {
    fn from(disposition: LeaveDisposition) -> Self {
        match disposition {
            LeaveDisposition::Transfer { new_owner_id } => Self::transfer(new_owner_id),
            LeaveDisposition::Close => Self::close(),
        }
    }
}
