//! Settlement periods and reports

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Named date range used as a report bookmark
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SettlementPeriod {
    pub id: i64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub name: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPeriodCreate {
    pub from_date: String,
    pub to_date: String,
    pub name: Option<String>,
}

/// GET /api/reports/settlement query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettlementQuery {
    pub period_id: Option<i64>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

/// Deposits of one member (or anonymous, `member_id = None`) within a report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MemberDepositTotal {
    pub member_id: Option<i64>,
    pub member_name: Option<String>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub name: Option<String>,
    pub total_deposits: f64,
    pub total_spending: f64,
    /// Club fund at the end of the day before `from_date`
    pub opening_balance: f64,
    /// Club fund at the end of `to_date`
    pub balance_at_end: f64,
    pub per_member_deposits: Vec<MemberDepositTotal>,
}
