//! Dashboard stats and weekly streak

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubStats {
    pub club_fund: f64,
    pub total_deposits: f64,
    pub total_game_costs: f64,
    pub is_low_fund: bool,
    pub is_empty_fund: bool,
}

/// ISO week label plus whether a game was played in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekMark {
    /// `YYYY-Www`
    pub week_id: String,
    pub has_game: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_weeks: u32,
    pub weeks_with_games: Vec<String>,
    pub recent_weeks: Vec<WeekMark>,
    pub next_milestone: u32,
    pub milestone_progress: f64,
}
