use shared::models::{NeedPaymentRow, Payer, PaymentCover, PaymentListRow};
use sqlx::{PgPool, Postgres, Transaction};

pub async fn insert_need_payment(
    tx: &mut Transaction<'_, Postgres>,
    game_id: i64,
    payer: Payer,
    amount: f64,
    is_paid: bool,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO need_payments (
            id, game_id, member_id, guest_id, amount, is_paid, paid_from_club_fund, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
        "#,
    )
    .bind(super::snowflake_id())
    .bind(game_id)
    .bind(payer.member_id())
    .bind(payer.guest_id())
    .bind(amount)
    .bind(is_paid)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Open payments first, newest games first
pub async fn list(pool: &PgPool) -> Result<Vec<PaymentListRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT np.id, np.game_id, g.date AS game_date, g.note AS game_note,
               np.member_id, m.name AS member_name,
               np.guest_id, gu.name AS guest_name,
               np.amount, np.is_paid, np.paid_from_club_fund, np.created_at
        FROM need_payments np
        JOIN games g ON g.id = np.game_id
        LEFT JOIN members m ON m.id = np.member_id
        LEFT JOIN guests gu ON gu.id = np.guest_id
        ORDER BY np.is_paid ASC, g.date DESC, np.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn covers_for<'e>(
    exec: impl sqlx::PgExecutor<'e>,
    payment_ids: &[i64],
) -> Result<Vec<PaymentCover>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT pc.id, pc.payment_id, pc.member_id, m.name AS member_name, pc.amount
        FROM payment_covers pc
        JOIN members m ON m.id = pc.member_id
        WHERE pc.payment_id = ANY($1)
        ORDER BY m.name, pc.id
        "#,
    )
    .bind(payment_ids)
    .fetch_all(exec)
    .await
}

pub async fn find_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Option<NeedPaymentRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, game_id, member_id, guest_id, amount, is_paid, paid_from_club_fund, created_at
        FROM need_payments
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
}

pub async fn delete_covers(
    tx: &mut Transaction<'_, Postgres>,
    payment_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM payment_covers WHERE payment_id = $1")
        .bind(payment_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn insert_cover(
    tx: &mut Transaction<'_, Postgres>,
    payment_id: i64,
    member_id: i64,
    amount: f64,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO payment_covers (id, payment_id, member_id, amount, created_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(super::snowflake_id())
    .bind(payment_id)
    .bind(member_id)
    .bind(amount)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn set_state(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
    is_paid: bool,
    paid_from_club_fund: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE need_payments SET is_paid = $2, paid_from_club_fund = $3 WHERE id = $1")
        .bind(id)
        .bind(is_paid)
        .bind(paid_from_club_fund)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
