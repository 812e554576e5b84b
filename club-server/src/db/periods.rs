use chrono::NaiveDate;
use shared::models::SettlementPeriod;
use sqlx::PgPool;

const PERIOD_COLUMNS: &str = "id, from_date, to_date, name, created_at";

pub async fn list(pool: &PgPool) -> Result<Vec<SettlementPeriod>, sqlx::Error> {
    let sql = format!(
        "SELECT {PERIOD_COLUMNS} FROM settlement_periods ORDER BY to_date DESC, created_at DESC"
    );
    sqlx::query_as(&sql).fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<SettlementPeriod>, sqlx::Error> {
    let sql = format!("SELECT {PERIOD_COLUMNS} FROM settlement_periods WHERE id = $1");
    sqlx::query_as(&sql).bind(id).fetch_optional(pool).await
}

/// Period with the latest `to_date`
pub async fn latest(pool: &PgPool) -> Result<Option<SettlementPeriod>, sqlx::Error> {
    let sql = format!(
        "SELECT {PERIOD_COLUMNS} FROM settlement_periods ORDER BY to_date DESC, created_at DESC LIMIT 1"
    );
    sqlx::query_as(&sql).fetch_optional(pool).await
}

pub async fn create(
    pool: &PgPool,
    id: i64,
    from_date: NaiveDate,
    to_date: NaiveDate,
    name: Option<&str>,
    now: i64,
) -> Result<SettlementPeriod, sqlx::Error> {
    let sql = format!(
        "INSERT INTO settlement_periods (id, from_date, to_date, name, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING {PERIOD_COLUMNS}"
    );
    sqlx::query_as(&sql)
        .bind(id)
        .bind(from_date)
        .bind(to_date)
        .bind(name)
        .bind(now)
        .fetch_one(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM settlement_periods WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
