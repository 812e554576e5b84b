//! Monthly participation ranking
//!
//! Rate = games attended ÷ games played that month, as a percentage with two
//! decimals. Order: rate desc, attended desc, name asc, id asc. Ranks are
//! positional; members who did not play are not ranked.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    BadgeJobOutcome, BadgeMonth, LeaderboardEntry, MemberAttendance, MonthlyLeaderboard,
};
use sqlx::PgPool;

use crate::db;
use crate::error::ServiceResult;
use crate::money::to_f64;
use crate::time::{month_bounds, previous_month, today, trailing_months};

/// Live leaderboard size
pub const LEADERBOARD_SIZE: usize = 10;

/// Months shown in a member's badge history
pub const HISTORY_MONTHS: usize = 12;

pub fn participation_rate(attended: i64, total_games: i64) -> f64 {
    if total_games <= 0 {
        return 0.0;
    }
    to_f64(Decimal::from(attended) * Decimal::from(100) / Decimal::from(total_games))
}

pub fn rank_attendance(rows: Vec<MemberAttendance>, total_games: i64) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = rows
        .into_iter()
        .filter(|r| r.games_attended > 0)
        .map(|r| LeaderboardEntry {
            participation_rate: participation_rate(r.games_attended, total_games),
            member_id: r.member_id,
            name: r.name,
            color: r.color,
            letter: r.letter,
            games_attended: r.games_attended,
            total_games,
            rank: 0,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.participation_rate
            .partial_cmp(&a.participation_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.games_attended.cmp(&a.games_attended))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.member_id.cmp(&b.member_id))
    });
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as i32 + 1;
    }
    entries
}

/// Whether the job should (re)compute a finished month.
///
/// Existing rows are kept, except on the first day of the new month.
pub fn should_compute(today: NaiveDate, already_cached: bool) -> bool {
    !already_cached || today.day() == 1
}

fn bounds(year: i32, month: u32) -> ServiceResult<(NaiveDate, NaiveDate)> {
    month_bounds(year, month).ok_or_else(|| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Invalid month {year}-{month}"))
            .into()
    })
}

/// Full ranking for a month
pub async fn month_ranking(
    pool: &PgPool,
    year: i32,
    month: u32,
) -> ServiceResult<(i64, Vec<LeaderboardEntry>)> {
    let (from, to) = bounds(year, month)?;
    let total_games = db::badges::count_games(pool, from, to).await?;
    if total_games == 0 {
        return Ok((0, Vec::new()));
    }
    let rows = db::badges::attendance(pool, from, to).await?;
    Ok((total_games, rank_attendance(rows, total_games)))
}

/// Current month, top 10
pub async fn monthly_leaderboard(pool: &PgPool, tz: Tz) -> ServiceResult<MonthlyLeaderboard> {
    let now = today(tz);
    let (total_games, mut leaderboard) = month_ranking(pool, now.year(), now.month()).await?;
    leaderboard.truncate(LEADERBOARD_SIZE);
    Ok(MonthlyLeaderboard {
        month: now.month(),
        year: now.year(),
        total_games,
        leaderboard,
    })
}

/// Snapshot the month that just ended into the badge cache
pub async fn run_badge_job(pool: &PgPool, tz: Tz) -> ServiceResult<BadgeJobOutcome> {
    let now = today(tz);
    let (year, month) = previous_month(now.year(), now.month());

    let cached = db::badges::exists_for_month(pool, month, year).await?;
    if !should_compute(now, cached) {
        tracing::debug!(year, month, "Badges already computed, skipping");
        return Ok(BadgeJobOutcome {
            month,
            year,
            skipped: true,
            total_games: 0,
            badges_written: 0,
        });
    }

    let (total_games, ranking) = month_ranking(pool, year, month).await?;
    let written =
        db::badges::upsert_month(pool, month, year, &ranking, shared::util::now_millis()).await?;
    tracing::info!(year, month, total_games, written, "Monthly badges computed");

    Ok(BadgeJobOutcome {
        month,
        year,
        skipped: false,
        total_games,
        badges_written: written,
    })
}

/// The last 12 months for one member; months without games are omitted
pub async fn member_history(pool: &PgPool, tz: Tz, member_id: i64) -> ServiceResult<Vec<BadgeMonth>> {
    db::members::find_by_id(pool, member_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound).with_detail("member_id", member_id))?;

    let now = today(tz);
    let months = trailing_months(now.year(), now.month(), HISTORY_MONTHS);
    let Some(&(first_year, first_month)) = months.first() else {
        return Ok(Vec::new());
    };

    let cached: HashMap<(i32, u32), _> =
        db::badges::for_member_since(pool, member_id, first_year, first_month)
            .await?
            .into_iter()
            .map(|b| ((b.year, b.month as u32), b))
            .collect();

    let mut history = Vec::new();
    for (year, month) in months {
        let (total_games, ranking) = month_ranking(pool, year, month).await?;
        if total_games == 0 {
            continue;
        }
        let total_members = ranking.len() as i64;

        let entry = if let Some(badge) = cached.get(&(year, month)) {
            BadgeMonth {
                month,
                year,
                participation_rate: badge.participation_rate,
                rank: Some(badge.rank),
                games_attended: i64::from(badge.games_attended),
                total_games: i64::from(badge.total_games),
                total_members,
            }
        } else {
            let mine = ranking.iter().find(|e| e.member_id == member_id);
            BadgeMonth {
                month,
                year,
                participation_rate: mine.map(|e| e.participation_rate).unwrap_or(0.0),
                rank: mine.map(|e| e.rank),
                games_attended: mine.map(|e| e.games_attended).unwrap_or(0),
                total_games,
                total_members,
            }
        };
        history.push(entry);
    }
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, name: &str, attended: i64) -> MemberAttendance {
        MemberAttendance {
            member_id: id,
            name: name.into(),
            color: None,
            letter: None,
            games_attended: attended,
        }
    }

    #[test]
    fn test_participation_rate_rounding() {
        assert_eq!(participation_rate(1, 3), 33.33);
        assert_eq!(participation_rate(2, 3), 66.67);
        assert_eq!(participation_rate(5, 5), 100.0);
        assert_eq!(participation_rate(3, 0), 0.0);
    }

    #[test]
    fn test_ranking_ties_broken_by_name() {
        let ranked = rank_attendance(
            vec![
                row(1, "Minh", 5),
                row(2, "An", 5),
                row(3, "Binh", 3),
                row(4, "Chi", 0),
            ],
            5,
        );
        let order: Vec<(&str, i32)> = ranked.iter().map(|e| (e.name.as_str(), e.rank)).collect();
        assert_eq!(order, vec![("An", 1), ("Minh", 2), ("Binh", 3)]);
        assert_eq!(ranked[0].participation_rate, 100.0);
        assert_eq!(ranked[2].participation_rate, 60.0);
        assert!(ranked.iter().all(|e| e.total_games == 5));
    }

    #[test]
    fn test_ranking_same_name_uses_id() {
        let ranked = rank_attendance(vec![row(9, "Lan", 2), row(4, "Lan", 2)], 4);
        assert_eq!(ranked[0].member_id, 4);
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_ranking_empty_month() {
        assert!(rank_attendance(vec![], 0).is_empty());
    }

    #[test]
    fn test_should_compute() {
        let first = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let mid = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        assert!(should_compute(mid, false));
        assert!(!should_compute(mid, true));
        assert!(should_compute(first, true));
    }
}
