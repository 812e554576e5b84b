//! Game Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::amount::AmountInput;

/// Game entity
///
/// `amount_san` / `amount_water` are legacy cost columns, only used for the
/// cost of games that have no expense lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Game {
    pub id: i64,
    pub date: NaiveDate,
    pub note: String,
    pub amount_san: f64,
    pub amount_water: f64,
    pub created_at: i64,
}

/// Expense line (e.g. court rental, shuttlecocks, water)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GameExpense {
    pub id: i64,
    pub game_id: i64,
    pub name: String,
    pub amount: f64,
}

/// Member shown on a game card / attendance list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GameParticipant {
    pub game_id: i64,
    pub member_id: i64,
    pub name: String,
    pub color: Option<String>,
    pub letter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GameGuestParticipant {
    pub game_id: i64,
    pub guest_id: i64,
    pub name: String,
}

/// Game with its expense lines and participants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDetail {
    #[serde(flatten)]
    pub game: Game,
    pub total_cost: f64,
    pub expenses: Vec<GameExpense>,
    pub members: Vec<GameParticipant>,
    pub guests: Vec<GameGuestParticipant>,
}

/// Expense line as submitted by a form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseInput {
    pub name: String,
    pub amount: AmountInput,
}

/// Create game payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameCreate {
    pub date: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub expenses: Vec<ExpenseInput>,
    #[serde(default)]
    pub amount_san: Option<AmountInput>,
    #[serde(default)]
    pub amount_water: Option<AmountInput>,
    #[serde(default)]
    pub member_ids: Vec<i64>,
    #[serde(default)]
    pub guest_ids: Vec<i64>,
}

/// Edit game payload; `expenses`, when present, replaces every line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameUpdate {
    pub date: Option<String>,
    pub note: Option<String>,
    pub expenses: Option<Vec<ExpenseInput>>,
}

/// Result of a game creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameCreated {
    pub id: i64,
    pub date: NaiveDate,
    pub note: String,
    pub total_cost: f64,
    pub share: f64,
    pub member_ids: Vec<i64>,
    pub guest_ids: Vec<i64>,
    pub club_fund_after: f64,
}

/// Attendance check-in payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceCreate {
    pub member_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceCreated {
    pub game_id: i64,
    pub member_id: i64,
}
