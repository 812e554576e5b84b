use chrono::NaiveDate;
use shared::models::{LeaderboardEntry, MemberAttendance, MemberBadge};
use sqlx::PgPool;

pub async fn count_games(pool: &PgPool, from: NaiveDate, to: NaiveDate) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM games WHERE date >= $1 AND date <= $2")
            .bind(from)
            .bind(to)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

/// Members who attended at least one game in the range
pub async fn attendance(
    pool: &PgPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<MemberAttendance>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT m.id AS member_id, m.name, m.color, m.letter,
               COUNT(DISTINCT gm.game_id) AS games_attended
        FROM members m
        JOIN game_members gm ON gm.member_id = m.id
        JOIN games g ON g.id = gm.game_id
        WHERE g.date >= $1 AND g.date <= $2
        GROUP BY m.id, m.name, m.color, m.letter
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

pub async fn exists_for_month(pool: &PgPool, month: u32, year: i32) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM member_badges WHERE month = $1 AND year = $2)",
    )
    .bind(month as i32)
    .bind(year)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Replace a month's cache rows with a fresh ranking
pub async fn upsert_month(
    pool: &PgPool,
    month: u32,
    year: i32,
    ranking: &[LeaderboardEntry],
    now: i64,
) -> Result<usize, sqlx::Error> {
    let mut tx = pool.begin().await?;
    for entry in ranking {
        sqlx::query(
            r#"
            INSERT INTO member_badges (
                id, member_id, month, year, participation_rate, rank,
                games_attended, total_games, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (member_id, month, year)
            DO UPDATE SET
                participation_rate = EXCLUDED.participation_rate,
                rank = EXCLUDED.rank,
                games_attended = EXCLUDED.games_attended,
                total_games = EXCLUDED.total_games,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(super::snowflake_id())
        .bind(entry.member_id)
        .bind(month as i32)
        .bind(year)
        .bind(entry.participation_rate)
        .bind(entry.rank)
        .bind(entry.games_attended as i32)
        .bind(entry.total_games as i32)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(ranking.len())
}

/// Cached rows for a member from `(from_year, from_month)` onward
pub async fn for_member_since(
    pool: &PgPool,
    member_id: i64,
    from_year: i32,
    from_month: u32,
) -> Result<Vec<MemberBadge>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT member_id, month, year, participation_rate, rank, games_attended, total_games
        FROM member_badges
        WHERE member_id = $1 AND (year * 12 + month) >= ($2 * 12 + $3)
        ORDER BY year, month
        "#,
    )
    .bind(member_id)
    .bind(from_year)
    .bind(from_month as i32)
    .fetch_all(pool)
    .await
}
