//! Aggregations behind the balance calculator and the settlement report
//!
//! Date bounds are inclusive; `None` leaves that side open.

use chrono::NaiveDate;
use shared::models::MemberDepositTotal;
use sqlx::{PgExecutor, PgPool};

pub async fn deposits_total<'e>(
    exec: impl PgExecutor<'e>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<f64, sqlx::Error> {
    let (total,): (f64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(amount), 0)::DOUBLE PRECISION
        FROM deposits
        WHERE ($1::DATE IS NULL OR date >= $1)
          AND ($2::DATE IS NULL OR date <= $2)
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_one(exec)
    .await?;
    Ok(total)
}

/// Σ game cost, each game counted once: its expense lines when it has any,
/// otherwise `amount_san + amount_water`
pub async fn game_costs_total<'e>(
    exec: impl PgExecutor<'e>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<f64, sqlx::Error> {
    let (total,): (f64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(COALESCE(e.total, g.amount_san + g.amount_water)), 0)::DOUBLE PRECISION
        FROM games g
        LEFT JOIN (
            SELECT game_id, SUM(amount) AS total
            FROM game_expenses
            GROUP BY game_id
        ) e ON e.game_id = g.id
        WHERE ($1::DATE IS NULL OR g.date >= $1)
          AND ($2::DATE IS NULL OR g.date <= $2)
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_one(exec)
    .await?;
    Ok(total)
}

/// Legacy cost columns only (schema without expense lines)
pub async fn legacy_game_costs_total<'e>(
    exec: impl PgExecutor<'e>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<f64, sqlx::Error> {
    let (total,): (f64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(amount_san + amount_water), 0)::DOUBLE PRECISION
        FROM games
        WHERE ($1::DATE IS NULL OR date >= $1)
          AND ($2::DATE IS NULL OR date <= $2)
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_one(exec)
    .await?;
    Ok(total)
}

/// (Σ deposits, Σ paid payments, Σ covers) for one member
pub async fn member_totals(pool: &PgPool, member_id: i64) -> Result<(f64, f64, f64), sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            COALESCE((SELECT SUM(amount) FROM deposits WHERE member_id = $1), 0)::DOUBLE PRECISION,
            COALESCE((SELECT SUM(amount) FROM need_payments
                      WHERE member_id = $1 AND is_paid), 0)::DOUBLE PRECISION,
            COALESCE((SELECT SUM(amount) FROM payment_covers WHERE member_id = $1), 0)::DOUBLE PRECISION
        "#,
    )
    .bind(member_id)
    .fetch_one(pool)
    .await
}

/// Earliest deposit or game date, `None` on an empty store
pub async fn earliest_activity_date(pool: &PgPool) -> Result<Option<NaiveDate>, sqlx::Error> {
    let (date,): (Option<NaiveDate>,) = sqlx::query_as(
        "SELECT LEAST((SELECT MIN(date) FROM deposits), (SELECT MIN(date) FROM games))",
    )
    .fetch_one(pool)
    .await?;
    Ok(date)
}

/// Deposits per member within the range; anonymous deposits grouped under `None`
pub async fn deposits_by_member(
    pool: &PgPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<MemberDepositTotal>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT d.member_id, MAX(m.name) AS member_name,
               COALESCE(SUM(d.amount), 0)::DOUBLE PRECISION AS total
        FROM deposits d
        LEFT JOIN members m ON m.id = d.member_id
        WHERE d.date >= $1 AND d.date <= $2
        GROUP BY d.member_id
        HAVING COALESCE(SUM(d.amount), 0) > 0
        ORDER BY total DESC
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}
