//! Weekly play streak over ISO weeks

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use shared::models::{StreakSummary, WeekMark};
use sqlx::PgPool;

use crate::db;
use crate::error::ServiceResult;
use crate::time::{iso_week_id, today, week_start};

pub const MILESTONES: [u32; 8] = [5, 10, 15, 20, 25, 30, 50, 100];

const RECENT_WEEKS: usize = 8;

fn next_milestone(streak: u32) -> u32 {
    MILESTONES
        .iter()
        .copied()
        .find(|m| *m > streak)
        .unwrap_or(100)
}

/// Streak summary from the dates games were played on
pub fn compute_streak(game_dates: &[NaiveDate], today: NaiveDate) -> StreakSummary {
    let weeks: BTreeSet<NaiveDate> = game_dates.iter().map(|d| week_start(*d)).collect();
    let this_week = week_start(today);
    let one_week = Duration::days(7);

    // An empty current week does not break a streak that ended last week
    let mut cursor = if weeks.contains(&this_week) {
        this_week
    } else {
        this_week - one_week
    };
    let mut current = 0u32;
    while weeks.contains(&cursor) {
        current += 1;
        cursor -= one_week;
    }

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for week in &weeks {
        run = match prev {
            Some(p) if *week - p == one_week => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(*week);
    }

    let recent_weeks = (0..RECENT_WEEKS)
        .rev()
        .map(|i| {
            let week = this_week - one_week * i as i32;
            WeekMark {
                week_id: iso_week_id(week),
                has_game: weeks.contains(&week),
            }
        })
        .collect();

    let next = next_milestone(current);
    let progress = (f64::from(current) / f64::from(next) * 100.0).min(100.0);

    StreakSummary {
        current_streak: current,
        longest_streak: longest,
        total_weeks: weeks.len() as u32,
        weeks_with_games: weeks.iter().map(|w| iso_week_id(*w)).collect(),
        recent_weeks,
        next_milestone: next,
        milestone_progress: (progress * 100.0).round() / 100.0,
    }
}

pub async fn streak(pool: &PgPool, tz: Tz) -> ServiceResult<StreakSummary> {
    let dates = db::games::distinct_dates(pool).await?;
    Ok(compute_streak(&dates, today(tz)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_no_games() {
        let s = compute_streak(&[], d(2025, 3, 12));
        assert_eq!(s.current_streak, 0);
        assert_eq!(s.longest_streak, 0);
        assert_eq!(s.total_weeks, 0);
        assert_eq!(s.next_milestone, 5);
        assert_eq!(s.milestone_progress, 0.0);
        assert_eq!(s.recent_weeks.len(), 8);
        assert!(s.recent_weeks.iter().all(|w| !w.has_game));
    }

    #[test]
    fn test_current_streak_counts_back_from_this_week() {
        // Wednesday 2025-03-12; games in the three weeks up to and including this one
        let dates = [d(2025, 2, 26), d(2025, 3, 4), d(2025, 3, 6), d(2025, 3, 10)];
        let s = compute_streak(&dates, d(2025, 3, 12));
        assert_eq!(s.current_streak, 3);
        assert_eq!(s.longest_streak, 3);
        assert_eq!(s.total_weeks, 3);
        assert_eq!(s.milestone_progress, 60.0);
    }

    #[test]
    fn test_empty_current_week_keeps_last_weeks_streak() {
        let dates = [d(2025, 2, 26), d(2025, 3, 4)];
        let s = compute_streak(&dates, d(2025, 3, 12));
        assert_eq!(s.current_streak, 2);
    }

    #[test]
    fn test_gap_breaks_current_streak() {
        let dates = [d(2025, 2, 12), d(2025, 2, 19), d(2025, 2, 26)];
        // Two empty weeks before today's week
        let s = compute_streak(&dates, d(2025, 3, 19));
        assert_eq!(s.current_streak, 0);
        assert_eq!(s.longest_streak, 3);
    }

    #[test]
    fn test_longest_streak_across_year_boundary() {
        // ISO weeks 2024-W51, 2024-W52, 2025-W01, 2025-W02
        let dates = [d(2024, 12, 18), d(2024, 12, 25), d(2024, 12, 31), d(2025, 1, 8)];
        let s = compute_streak(&dates, d(2025, 6, 1));
        assert_eq!(s.longest_streak, 4);
        assert_eq!(
            s.weeks_with_games,
            vec!["2024-W51", "2024-W52", "2025-W01", "2025-W02"]
        );
    }

    #[test]
    fn test_recent_weeks_end_with_current_week() {
        let today = d(2025, 3, 12);
        let s = compute_streak(&[today], today);
        let last = s.recent_weeks.last().unwrap();
        assert_eq!(last.week_id, "2025-W11");
        assert!(last.has_game);
        assert_eq!(s.recent_weeks.first().unwrap().week_id, "2025-W04");
    }

    #[test]
    fn test_milestones() {
        assert_eq!(next_milestone(0), 5);
        assert_eq!(next_milestone(5), 10);
        assert_eq!(next_milestone(49), 50);
        assert_eq!(next_milestone(100), 100);
        assert_eq!(next_milestone(140), 100);
    }

    #[test]
    fn test_progress_is_capped() {
        let start = d(2023, 1, 2);
        let dates: Vec<NaiveDate> = (0..120).map(|i| start + Duration::days(7 * i)).collect();
        let today = *dates.last().unwrap();
        let s = compute_streak(&dates, today);
        assert_eq!(s.current_streak, 120);
        assert_eq!(s.milestone_progress, 100.0);
    }
}
