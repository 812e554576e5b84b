use shared::models::{Member, MemberDeposit, MemberGame};
use sqlx::{PgExecutor, PgPool};

/// Member row plus derived balance, computed in one pass
#[derive(sqlx::FromRow)]
pub struct MemberBalanceRow {
    #[sqlx(flatten)]
    pub member: Member,
    pub total_deposits: f64,
    pub total_paid: f64,
    pub total_covers: f64,
}

const BALANCE_SELECT: &str = r#"
    SELECT
        m.id, m.name, m.color, m.letter, m.is_active, m.created_at,
        COALESCE((SELECT SUM(d.amount) FROM deposits d WHERE d.member_id = m.id), 0)::DOUBLE PRECISION
            AS total_deposits,
        COALESCE((SELECT SUM(np.amount) FROM need_payments np
                  WHERE np.member_id = m.id AND np.is_paid), 0)::DOUBLE PRECISION
            AS total_paid,
        COALESCE((SELECT SUM(pc.amount) FROM payment_covers pc WHERE pc.member_id = m.id), 0)::DOUBLE PRECISION
            AS total_covers
    FROM members m
"#;

pub async fn list_with_totals(
    pool: &PgPool,
    active_only: bool,
) -> Result<Vec<MemberBalanceRow>, sqlx::Error> {
    let sql = format!("{BALANCE_SELECT} WHERE ($1 = FALSE OR m.is_active) ORDER BY m.name, m.id");
    sqlx::query_as(&sql).bind(active_only).fetch_all(pool).await
}

pub async fn find_by_id<'e>(
    exec: impl PgExecutor<'e>,
    id: i64,
) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, color, letter, is_active, created_at FROM members WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(exec)
    .await
}

/// Members among `ids` (missing ids are simply absent)
pub async fn find_many<'e>(
    exec: impl PgExecutor<'e>,
    ids: &[i64],
) -> Result<Vec<Member>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, color, letter, is_active, created_at FROM members WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(exec)
    .await
}

pub async fn create<'e>(
    exec: impl PgExecutor<'e>,
    id: i64,
    name: &str,
    color: &str,
    letter: &str,
    now: i64,
) -> Result<Member, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO members (id, name, color, letter, is_active, created_at)
        VALUES ($1, $2, $3, $4, TRUE, $5)
        RETURNING id, name, color, letter, is_active, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(color)
    .bind(letter)
    .bind(now)
    .fetch_one(exec)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    name: &str,
    color: &str,
    letter: &str,
    is_active: Option<bool>,
) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE members SET
            name = $2, color = $3, letter = $4,
            is_active = COALESCE($5, is_active)
        WHERE id = $1
        RETURNING id, name, color, letter, is_active, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(color)
    .bind(letter)
    .bind(is_active)
    .fetch_optional(pool)
    .await
}

/// Soft delete; returns false when the member does not exist
pub async fn deactivate(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE members SET is_active = FALSE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_deposits(pool: &PgPool, member_id: i64) -> Result<Vec<MemberDeposit>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, date, amount, created_at
        FROM deposits
        WHERE member_id = $1
        ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(member_id)
    .fetch_all(pool)
    .await
}

/// Most recent games a member attended, with the number of members in each
pub async fn recent_games(
    pool: &PgPool,
    member_id: i64,
    limit: i64,
) -> Result<Vec<MemberGame>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT g.id, g.date, g.note, g.created_at,
               (SELECT COUNT(*) FROM game_members x WHERE x.game_id = g.id) AS member_count
        FROM game_members gm
        JOIN games g ON g.id = gm.game_id
        WHERE gm.member_id = $1
        ORDER BY g.date DESC, g.created_at DESC
        LIMIT $2
        "#,
    )
    .bind(member_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
