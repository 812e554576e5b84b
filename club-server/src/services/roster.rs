//! Members and guests

use futures::future::join_all;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    BulkCreateResult, BulkFailure, Guest, GuestStatus, Member, MemberCreate, MemberGame,
    MemberStats, MemberUpdate, MemberWithBalance,
};
use sqlx::PgPool;

use crate::avatar;
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::money::to_f64;
use crate::services::ledger::{self, MemberTotals};
use crate::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, split_names, validate_optional_text, validate_required_text,
};

/// Games shown in a member's history
pub const RECENT_GAMES: i64 = 10;

// ── Members ──

pub async fn list_members(pool: &PgPool, active_only: bool) -> ServiceResult<Vec<MemberWithBalance>> {
    let rows = db::members::list_with_totals(pool, active_only).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let totals = MemberTotals::from_f64(row.total_deposits, row.total_paid, row.total_covers);
            MemberWithBalance {
                member: row.member,
                balance: to_f64(totals.balance()),
            }
        })
        .collect())
}

pub async fn find_member(pool: &PgPool, id: i64) -> ServiceResult<Member> {
    db::members::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound).with_detail("member_id", id).into())
}

fn validate_member_fields(
    name: &str,
    color: &Option<String>,
    letter: &Option<String>,
) -> Result<(), AppError> {
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    validate_optional_text(color, "color", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(letter, "letter", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

pub async fn create_member(pool: &PgPool, input: &MemberCreate) -> ServiceResult<Member> {
    validate_member_fields(&input.name, &input.color, &input.letter)?;
    let name = input.name.trim();
    let (color, letter) = avatar::resolve(name, input.color.clone(), input.letter.clone());

    let member = db::members::create(
        pool,
        shared::util::snowflake_id(),
        name,
        &color,
        &letter,
        shared::util::now_millis(),
    )
    .await?;
    tracing::info!(member_id = member.id, name = %member.name, "Member created");
    Ok(member)
}

pub async fn update_member(pool: &PgPool, id: i64, input: &MemberUpdate) -> ServiceResult<Member> {
    validate_member_fields(&input.name, &input.color, &input.letter)?;
    let name = input.name.trim();
    let (color, letter) = avatar::resolve(name, input.color.clone(), input.letter.clone());

    db::members::update(pool, id, name, &color, &letter, input.is_active)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound).with_detail("member_id", id).into())
}

/// Soft delete: history keeps referring to the member
pub async fn deactivate_member(pool: &PgPool, id: i64) -> ServiceResult<()> {
    if !db::members::deactivate(pool, id).await? {
        return Err(AppError::new(ErrorCode::MemberNotFound)
            .with_detail("member_id", id)
            .into());
    }
    tracing::info!(member_id = id, "Member deactivated");
    Ok(())
}

pub async fn member_stats(pool: &PgPool, id: i64) -> ServiceResult<MemberStats> {
    let member = find_member(pool, id).await?;
    let totals = ledger::member_totals(pool, id).await?;
    let deposits = db::members::list_deposits(pool, id).await?;
    let recent_games = db::members::recent_games(pool, id, RECENT_GAMES).await?;

    Ok(MemberStats {
        member,
        balance: to_f64(totals.balance()),
        deposit_count: deposits.len(),
        total_deposits: to_f64(totals.deposits),
        total_spending: to_f64(totals.spending()),
        total_covers: to_f64(totals.covers),
        deposits,
        recent_games,
    })
}

pub async fn member_games(pool: &PgPool, id: i64) -> ServiceResult<Vec<MemberGame>> {
    find_member(pool, id).await?;
    Ok(db::members::recent_games(pool, id, RECENT_GAMES).await?)
}

fn failure(name: String, err: ServiceError) -> BulkFailure {
    let app: AppError = err.into();
    BulkFailure {
        name,
        error: app.message,
    }
}

/// Create one member per comma-separated name; failures do not stop the rest
pub async fn bulk_create_members(pool: &PgPool, names: &str) -> ServiceResult<BulkCreateResult<Member>> {
    let names = split_names(names);
    if names.is_empty() {
        return Err(AppError::validation("names must contain at least one name").into());
    }
    let results = join_all(names.iter().map(|name| {
        let input = MemberCreate {
            name: name.clone(),
            color: None,
            letter: None,
        };
        async move { create_member(pool, &input).await }
    }))
    .await;

    Ok(collect_bulk(names, results))
}

fn collect_bulk<T>(names: Vec<String>, results: Vec<ServiceResult<T>>) -> BulkCreateResult<T> {
    let mut created = Vec::new();
    let mut failed = Vec::new();
    for (name, result) in names.into_iter().zip(results) {
        match result {
            Ok(item) => created.push(item),
            Err(e) => failed.push(failure(name, e)),
        }
    }
    BulkCreateResult { created, failed }
}

// ── Guests ──

pub async fn list_guests(pool: &PgPool, selectable_only: bool) -> ServiceResult<Vec<Guest>> {
    let rows = db::guests::list(pool, selectable_only).await?;
    Ok(rows
        .into_iter()
        .map(Guest::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

async fn find_guest(pool: &PgPool, id: i64) -> ServiceResult<Guest> {
    let row = db::guests::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::GuestNotFound).with_detail("guest_id", id))?;
    Ok(Guest::try_from(row)?)
}

pub async fn create_guest(pool: &PgPool, name: &str) -> ServiceResult<Guest> {
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    let row = db::guests::create(
        pool,
        shared::util::snowflake_id(),
        name.trim(),
        shared::util::now_millis(),
    )
    .await?;
    Ok(Guest::try_from(row)?)
}

pub async fn bulk_create_guests(pool: &PgPool, names: &str) -> ServiceResult<BulkCreateResult<Guest>> {
    let names = split_names(names);
    if names.is_empty() {
        return Err(AppError::validation("names must contain at least one name").into());
    }
    let results = join_all(names.iter().map(|name| create_guest(pool, name))).await;
    Ok(collect_bulk(names, results))
}

pub async fn rename_guest(pool: &PgPool, id: i64, name: &str) -> ServiceResult<Guest> {
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    let guest = find_guest(pool, id).await?;
    guest.status.ensure_editable()?;
    let row = db::guests::rename(pool, id, name.trim())
        .await?
        .ok_or_else(|| promoted_meanwhile(id))?;
    Ok(Guest::try_from(row)?)
}

pub async fn set_guest_active(pool: &PgPool, id: i64, active: bool) -> ServiceResult<Guest> {
    let guest = find_guest(pool, id).await?;
    let next = guest.status.set_active(active)?;
    let row = db::guests::set_status(pool, id, next)
        .await?
        .ok_or_else(|| promoted_meanwhile(id))?;
    Ok(Guest::try_from(row)?)
}

/// A promotion committed between our read and the guarded write
fn promoted_meanwhile(id: i64) -> AppError {
    AppError::new(ErrorCode::GuestPromoted).with_detail("guest_id", id)
}

/// Turn a guest into a member with the same name; the guest is locked afterwards
pub async fn promote_guest(pool: &PgPool, id: i64) -> ServiceResult<Member> {
    let mut tx = pool.begin().await?;

    let row = db::guests::find_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::GuestNotFound).with_detail("guest_id", id))?;
    let guest = Guest::try_from(row)?;

    let member_id = shared::util::snowflake_id();
    let next: GuestStatus = guest.status.promote(member_id)?;

    let (color, letter) = avatar::resolve(&guest.name, None, None);
    let member = db::members::create(
        &mut *tx,
        member_id,
        &guest.name,
        &color,
        &letter,
        shared::util::now_millis(),
    )
    .await?;
    db::guests::set_status(&mut *tx, id, next)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::GuestAlreadyPromoted).with_detail("guest_id", id))?;
    tx.commit().await?;

    tracing::info!(guest_id = id, member_id, "Guest promoted to member");
    Ok(member)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_bulk_keeps_partial_success() {
        let names = vec!["An".to_string(), "".to_string(), "Chi".to_string()];
        let results: Vec<ServiceResult<i32>> = vec![
            Ok(1),
            Err(AppError::validation("name must not be empty").into()),
            Ok(3),
        ];
        let out = collect_bulk(names, results);
        assert_eq!(out.created, vec![1, 3]);
        assert_eq!(out.failed.len(), 1);
        assert_eq!(out.failed[0].error, "name must not be empty");
    }

    #[test]
    fn test_member_field_validation() {
        assert!(validate_member_fields("Lan", &None, &None).is_ok());
        assert!(validate_member_fields(" ", &None, &None).is_err());
        let long_color = Some("#".repeat(MAX_SHORT_TEXT_LEN + 1));
        assert!(validate_member_fields("Lan", &long_color, &None).is_err());
    }
}
