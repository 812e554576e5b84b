use chrono::NaiveDate;
use shared::models::{Game, GameExpense, GameGuestParticipant, GameParticipant};
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

const GAME_COLUMNS: &str = "id, date, note, amount_san, amount_water, created_at";

// ── Read ──

pub async fn list(
    pool: &PgPool,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<Game>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {GAME_COLUMNS}
        FROM games
        WHERE ($1::DATE IS NULL OR date >= $1)
          AND ($2::DATE IS NULL OR date <= $2)
        ORDER BY date DESC, created_at DESC
        "#
    );
    sqlx::query_as(&sql).bind(from).bind(to).fetch_all(pool).await
}

pub async fn find_by_id<'e>(
    exec: impl PgExecutor<'e>,
    id: i64,
) -> Result<Option<Game>, sqlx::Error> {
    let sql = format!("SELECT {GAME_COLUMNS} FROM games WHERE id = $1");
    sqlx::query_as(&sql).bind(id).fetch_optional(exec).await
}

pub async fn expenses_for<'e>(
    exec: impl PgExecutor<'e>,
    game_ids: &[i64],
) -> Result<Vec<GameExpense>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, game_id, name, amount FROM game_expenses WHERE game_id = ANY($1) ORDER BY game_id, id",
    )
    .bind(game_ids)
    .fetch_all(exec)
    .await
}

pub async fn members_for(
    pool: &PgPool,
    game_ids: &[i64],
) -> Result<Vec<GameParticipant>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT gm.game_id, gm.member_id, m.name, m.color, m.letter
        FROM game_members gm
        JOIN members m ON m.id = gm.member_id
        WHERE gm.game_id = ANY($1)
        ORDER BY m.name, m.id
        "#,
    )
    .bind(game_ids)
    .fetch_all(pool)
    .await
}

pub async fn guests_for(
    pool: &PgPool,
    game_ids: &[i64],
) -> Result<Vec<GameGuestParticipant>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT gg.game_id, gg.guest_id, g.name
        FROM game_guests gg
        JOIN guests g ON g.id = gg.guest_id
        WHERE gg.game_id = ANY($1)
        ORDER BY g.name, g.id
        "#,
    )
    .bind(game_ids)
    .fetch_all(pool)
    .await
}

// ── Write (transactional) ──

pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    game: &Game,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO games (id, date, note, amount_san, amount_water, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(game.id)
    .bind(game.date)
    .bind(&game.note)
    .bind(game.amount_san)
    .bind(game.amount_water)
    .bind(game.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn insert_expense(
    tx: &mut Transaction<'_, Postgres>,
    game_id: i64,
    name: &str,
    amount: f64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO game_expenses (id, game_id, name, amount) VALUES ($1, $2, $3, $4)")
        .bind(super::snowflake_id())
        .bind(game_id)
        .bind(name)
        .bind(amount)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn delete_expenses(
    tx: &mut Transaction<'_, Postgres>,
    game_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM game_expenses WHERE game_id = $1")
        .bind(game_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn insert_member_link<'e>(
    exec: impl PgExecutor<'e>,
    game_id: i64,
    member_id: i64,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO game_members (id, game_id, member_id, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(super::snowflake_id())
    .bind(game_id)
    .bind(member_id)
    .bind(now)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn insert_guest_link(
    tx: &mut Transaction<'_, Postgres>,
    game_id: i64,
    guest_id: i64,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO game_guests (id, game_id, guest_id, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(super::snowflake_id())
    .bind(game_id)
    .bind(guest_id)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn update_header(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
    date: NaiveDate,
    note: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE games SET date = $2, note = $3 WHERE id = $1")
        .bind(id)
        .bind(date)
        .bind(note)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Remove a game and everything hanging off it. Returns false when absent.
pub async fn delete_cascade(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query(
        "DELETE FROM payment_covers WHERE payment_id IN (SELECT id FROM need_payments WHERE game_id = $1)",
    )
    .bind(id)
    .execute(&mut **tx)
    .await?;
    for table in ["need_payments", "game_members", "game_guests", "game_expenses"] {
        sqlx::query(&format!("DELETE FROM {table} WHERE game_id = $1"))
            .bind(id)
            .execute(&mut **tx)
            .await?;
    }
    let result = sqlx::query("DELETE FROM games WHERE id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Every date with at least one game, ascending
pub async fn distinct_dates(pool: &PgPool) -> Result<Vec<NaiveDate>, sqlx::Error> {
    let rows: Vec<(NaiveDate,)> = sqlx::query_as("SELECT DISTINCT date FROM games ORDER BY date")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(d,)| d).collect())
}
