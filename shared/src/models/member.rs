//! Member Model

use serde::{Deserialize, Serialize};

/// Member entity
///
/// Balance is never stored; see [`MemberWithBalance`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
    pub letter: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

/// Member row plus the balance derived at read time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberWithBalance {
    #[serde(flatten)]
    pub member: Member,
    pub balance: f64,
}

/// Create member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCreate {
    pub name: String,
    pub color: Option<String>,
    pub letter: Option<String>,
}

/// Update member payload (name/color/letter are replaced as a whole)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub name: String,
    pub color: Option<String>,
    pub letter: Option<String>,
    pub is_active: Option<bool>,
}

/// Bulk create payload: names separated by commas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkNames {
    pub names: String,
}

/// Partial-success report for bulk creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateResult<T> {
    pub created: Vec<T>,
    pub failed: Vec<BulkFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkFailure {
    pub name: String,
    pub error: String,
}

/// Game a member attended (history view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MemberGame {
    pub id: i64,
    pub date: chrono::NaiveDate,
    pub note: String,
    pub created_at: i64,
    pub member_count: i64,
}

/// Deposit line in the member stats view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MemberDeposit {
    pub id: i64,
    pub date: chrono::NaiveDate,
    pub amount: f64,
    pub created_at: i64,
}

/// GET /api/members/{id}/stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberStats {
    pub member: Member,
    pub balance: f64,
    pub deposit_count: usize,
    pub total_deposits: f64,
    /// Paid game shares plus covers issued for guests
    pub total_spending: f64,
    pub total_covers: f64,
    pub deposits: Vec<MemberDeposit>,
    pub recent_games: Vec<MemberGame>,
}
