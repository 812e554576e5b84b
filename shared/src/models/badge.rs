//! Monthly participation badges and leaderboard

use serde::{Deserialize, Serialize};

/// Cached monthly ranking row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MemberBadge {
    pub member_id: i64,
    pub month: i32,
    pub year: i32,
    pub participation_rate: f64,
    pub rank: i32,
    pub games_attended: i32,
    pub total_games: i32,
}

/// Attendance count for one member in one month
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MemberAttendance {
    pub member_id: i64,
    pub name: String,
    pub color: Option<String>,
    pub letter: Option<String>,
    pub games_attended: i64,
}

/// Ranked member for a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub member_id: i64,
    pub name: String,
    pub color: Option<String>,
    pub letter: Option<String>,
    pub games_attended: i64,
    pub total_games: i64,
    pub participation_rate: f64,
    pub rank: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyLeaderboard {
    pub month: u32,
    pub year: i32,
    pub total_games: i64,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// One month in a member's badge history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeMonth {
    pub month: u32,
    pub year: i32,
    pub participation_rate: f64,
    /// `None` when the member did not play that month
    pub rank: Option<i32>,
    pub games_attended: i64,
    pub total_games: i64,
    pub total_members: i64,
}

/// Outcome of the monthly badge job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeJobOutcome {
    pub month: u32,
    pub year: i32,
    pub skipped: bool,
    pub total_games: i64,
    pub badges_written: usize,
}
