use shared::models::{GuestRow, GuestStatus};
use sqlx::{PgExecutor, PgPool};

const GUEST_COLUMNS: &str = "id, name, status, promoted_to_member_id, created_at";

/// All guests, or only the ones selectable for a new game
pub async fn list(pool: &PgPool, selectable_only: bool) -> Result<Vec<GuestRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {GUEST_COLUMNS} FROM guests WHERE ($1 = FALSE OR status = 'active') ORDER BY name, id"
    );
    sqlx::query_as(&sql).bind(selectable_only).fetch_all(pool).await
}

pub async fn find_by_id<'e>(
    exec: impl PgExecutor<'e>,
    id: i64,
) -> Result<Option<GuestRow>, sqlx::Error> {
    let sql = format!("SELECT {GUEST_COLUMNS} FROM guests WHERE id = $1");
    sqlx::query_as(&sql).bind(id).fetch_optional(exec).await
}

/// Row-locking read used by promotion
pub async fn find_for_update<'e>(
    exec: impl PgExecutor<'e>,
    id: i64,
) -> Result<Option<GuestRow>, sqlx::Error> {
    let sql = format!("SELECT {GUEST_COLUMNS} FROM guests WHERE id = $1 FOR UPDATE");
    sqlx::query_as(&sql).bind(id).fetch_optional(exec).await
}

pub async fn find_many<'e>(
    exec: impl PgExecutor<'e>,
    ids: &[i64],
) -> Result<Vec<GuestRow>, sqlx::Error> {
    let sql = format!("SELECT {GUEST_COLUMNS} FROM guests WHERE id = ANY($1)");
    sqlx::query_as(&sql).bind(ids).fetch_all(exec).await
}

pub async fn create(pool: &PgPool, id: i64, name: &str, now: i64) -> Result<GuestRow, sqlx::Error> {
    let sql = format!(
        "INSERT INTO guests (id, name, status, created_at) VALUES ($1, $2, 'active', $3) RETURNING {GUEST_COLUMNS}"
    );
    sqlx::query_as(&sql)
        .bind(id)
        .bind(name)
        .bind(now)
        .fetch_one(pool)
        .await
}

/// Rename a guest that is not promoted; `None` once it is promoted
pub async fn rename(pool: &PgPool, id: i64, name: &str) -> Result<Option<GuestRow>, sqlx::Error> {
    let sql = format!(
        "UPDATE guests SET name = $2 WHERE id = $1 AND status <> 'promoted' RETURNING {GUEST_COLUMNS}"
    );
    sqlx::query_as(&sql).bind(id).bind(name).fetch_optional(pool).await
}

/// Persist a lifecycle state; promoted rows are never rewritten
pub async fn set_status<'e>(
    exec: impl PgExecutor<'e>,
    id: i64,
    status: GuestStatus,
) -> Result<Option<GuestRow>, sqlx::Error> {
    let sql = format!(
        "UPDATE guests SET status = $2, promoted_to_member_id = $3 \
         WHERE id = $1 AND status <> 'promoted' RETURNING {GUEST_COLUMNS}"
    );
    sqlx::query_as(&sql)
        .bind(id)
        .bind(status.as_str())
        .bind(status.promoted_member_id())
        .fetch_optional(exec)
        .await
}
