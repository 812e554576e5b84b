//! Guest Model
//!
//! A guest moves between `Active` and `Inactive` freely. Promotion to a member
//! is terminal: a promoted guest is locked against every further transition.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

/// Guest lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuestStatus {
    Active,
    Inactive,
    Promoted { member_id: i64 },
}

impl GuestStatus {
    /// Storage tag for the `guests.status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Promoted { .. } => "promoted",
        }
    }

    pub fn promoted_member_id(&self) -> Option<i64> {
        match self {
            Self::Promoted { member_id } => Some(*member_id),
            _ => None,
        }
    }

    /// Rebuild the state from its storage columns.
    pub fn from_columns(status: &str, promoted_to_member_id: Option<i64>) -> Option<Self> {
        match (status, promoted_to_member_id) {
            ("active", None) => Some(Self::Active),
            ("inactive", None) => Some(Self::Inactive),
            ("promoted", Some(member_id)) => Some(Self::Promoted { member_id }),
            _ => None,
        }
    }

    /// Only active guests can be picked for new games.
    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Rename and other edits are rejected once promoted.
    pub fn ensure_editable(&self) -> Result<(), AppError> {
        match self {
            Self::Promoted { .. } => Err(AppError::new(ErrorCode::GuestPromoted)),
            _ => Ok(()),
        }
    }

    pub fn set_active(&self, active: bool) -> Result<Self, AppError> {
        self.ensure_editable()?;
        Ok(if active { Self::Active } else { Self::Inactive })
    }

    pub fn promote(&self, member_id: i64) -> Result<Self, AppError> {
        match self {
            Self::Promoted { .. } => Err(AppError::new(ErrorCode::GuestAlreadyPromoted)),
            _ => Ok(Self::Promoted { member_id }),
        }
    }
}

/// Raw `guests` row
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GuestRow {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub promoted_to_member_id: Option<i64>,
    pub created_at: i64,
}

/// Guest entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub id: i64,
    pub name: String,
    pub status: GuestStatus,
    pub created_at: i64,
}

impl TryFrom<GuestRow> for Guest {
    type Error = AppError;

    fn try_from(row: GuestRow) -> Result<Self, Self::Error> {
        let status = GuestStatus::from_columns(&row.status, row.promoted_to_member_id)
            .ok_or_else(|| {
                AppError::internal(format!(
                    "Guest {} has inconsistent status '{}'",
                    row.id, row.status
                ))
            })?;
        Ok(Self {
            id: row.id,
            name: row.name,
            status,
            created_at: row.created_at,
        })
    }
}

/// Create guest payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestCreate {
    pub name: String,
}

/// Rename guest payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestUpdate {
    pub name: String,
}

/// Toggle active payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestActiveUpdate {
    pub is_active: bool,
}
