//! Deposit Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::amount::AmountInput;

/// Money paid into the club fund. `member_id = None` is an anonymous donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Deposit {
    pub id: i64,
    pub member_id: Option<i64>,
    pub date: NaiveDate,
    pub amount: f64,
    pub created_at: i64,
}

/// Deposit joined with its member for listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DepositWithMember {
    pub id: i64,
    pub member_id: Option<i64>,
    pub member_name: Option<String>,
    pub member_color: Option<String>,
    pub member_letter: Option<String>,
    pub date: NaiveDate,
    pub amount: f64,
    pub created_at: i64,
}

/// Create deposit payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositCreate {
    pub member_id: Option<i64>,
    /// `YYYY-MM-DD`; defaults to today in club time
    pub date: Option<String>,
    pub amount: AmountInput,
}

/// GET /api/deposits filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepositQuery {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub member_id: Option<i64>,
}
