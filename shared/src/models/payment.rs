//! Payment Model
//!
//! A `NeedPayment` is one participant's share of a game. Member shares are
//! settled at creation; guest shares stay open until resolved.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Who owes a payment; exactly one of the two storage columns is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payer {
    Member { id: i64 },
    Guest { id: i64 },
}

impl Payer {
    pub fn from_columns(member_id: Option<i64>, guest_id: Option<i64>) -> Option<Self> {
        match (member_id, guest_id) {
            (Some(id), None) => Some(Self::Member { id }),
            (None, Some(id)) => Some(Self::Guest { id }),
            _ => None,
        }
    }

    pub fn member_id(&self) -> Option<i64> {
        match self {
            Self::Member { id } => Some(*id),
            Self::Guest { .. } => None,
        }
    }

    pub fn guest_id(&self) -> Option<i64> {
        match self {
            Self::Guest { id } => Some(*id),
            Self::Member { .. } => None,
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest { .. })
    }
}

/// `need_payments` row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct NeedPaymentRow {
    pub id: i64,
    pub game_id: i64,
    pub member_id: Option<i64>,
    pub guest_id: Option<i64>,
    pub amount: f64,
    pub is_paid: bool,
    pub paid_from_club_fund: bool,
    pub created_at: i64,
}

/// Payment listing row joined with game and payer names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PaymentListRow {
    pub id: i64,
    pub game_id: i64,
    pub game_date: NaiveDate,
    pub game_note: String,
    pub member_id: Option<i64>,
    pub member_name: Option<String>,
    pub guest_id: Option<i64>,
    pub guest_name: Option<String>,
    pub amount: f64,
    pub is_paid: bool,
    pub paid_from_club_fund: bool,
    pub created_at: i64,
}

/// A member's part of a covered guest payment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PaymentCover {
    pub id: i64,
    pub payment_id: i64,
    pub member_id: i64,
    pub member_name: String,
    pub amount: f64,
}

/// Payment listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEntry {
    #[serde(flatten)]
    pub row: PaymentListRow,
    pub covers: Vec<PaymentCover>,
}

/// Requested resolution for a payment (PUT /api/payments/{id})
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum PaymentResolution {
    /// Back to open
    Unpaid,
    /// Paid directly by the payer
    PaidByPayer,
    /// Absorbed by the club fund (guest only)
    ClubFund,
    /// Split between members, each share rounded up (guest only)
    MemberCover { member_ids: Vec<i64> },
}

impl PaymentResolution {
    /// Whether this resolution is allowed for the given payer.
    pub fn allowed_for(&self, payer: &Payer) -> bool {
        match self {
            Self::Unpaid | Self::PaidByPayer => true,
            Self::ClubFund | Self::MemberCover { .. } => payer.is_guest(),
        }
    }
}

/// Payment state after a resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResolved {
    pub id: i64,
    pub is_paid: bool,
    pub paid_from_club_fund: bool,
    pub covers: Vec<PaymentCover>,
}
