use chrono::NaiveDate;
use shared::models::{Deposit, DepositWithMember};
use sqlx::PgPool;

pub async fn list(
    pool: &PgPool,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    member_id: Option<i64>,
) -> Result<Vec<DepositWithMember>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT d.id, d.member_id, m.name AS member_name, m.color AS member_color,
               m.letter AS member_letter, d.date, d.amount, d.created_at
        FROM deposits d
        LEFT JOIN members m ON m.id = d.member_id
        WHERE ($1::DATE IS NULL OR d.date >= $1)
          AND ($2::DATE IS NULL OR d.date <= $2)
          AND ($3::BIGINT IS NULL OR d.member_id = $3)
        ORDER BY d.date DESC, d.created_at DESC
        "#,
    )
    .bind(from)
    .bind(to)
    .bind(member_id)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    id: i64,
    member_id: Option<i64>,
    date: NaiveDate,
    amount: f64,
    now: i64,
) -> Result<Deposit, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO deposits (id, member_id, date, amount, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, member_id, date, amount, created_at
        "#,
    )
    .bind(id)
    .bind(member_id)
    .bind(date)
    .bind(amount)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Returns false when nothing was deleted
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM deposits WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
