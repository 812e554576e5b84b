//! Game orchestration
//!
//! Creation: validate → fund check → game + expense lines → one
//! participant link and one payment per member (settled) and per guest (open).
//! The split is computed once; later edits never touch the payments.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AttendanceCreated, ExpenseInput, Game, GameCreate, GameCreated, GameDetail, GameParticipant,
    GameUpdate, Guest, Payer,
};
use sqlx::PgPool;

use crate::db;
use crate::error::{ServiceResult, is_unique_violation};
use crate::money::{self, to_decimal, to_f64};
use crate::services::ledger;
use crate::time::parse_date;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, dedup_ids, parse_non_negative_amount, validate_optional_text,
    validate_required_text,
};

/// Validated expense line
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseLine {
    pub name: String,
    pub amount: f64,
}

/// Everything needed to persist a new game
#[derive(Debug, Clone)]
pub struct GamePlan {
    pub date: NaiveDate,
    pub note: String,
    pub expenses: Vec<ExpenseLine>,
    pub amount_san: f64,
    pub amount_water: f64,
    pub member_ids: Vec<i64>,
    pub guest_ids: Vec<i64>,
    pub total_cost: Decimal,
    pub share: Decimal,
}

impl GamePlan {
    pub fn participant_count(&self) -> usize {
        self.member_ids.len() + self.guest_ids.len()
    }
}

/// Cost of a game: its expense lines if any, else the legacy amounts
pub fn game_cost(expenses: &[f64], amount_san: f64, amount_water: f64) -> Decimal {
    if expenses.is_empty() {
        to_decimal(amount_san) + to_decimal(amount_water)
    } else {
        money::sum(expenses.iter().copied())
    }
}

pub fn validate_expenses(inputs: &[ExpenseInput]) -> Result<Vec<ExpenseLine>, AppError> {
    inputs
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let name = line.name.trim();
            validate_required_text(name, &format!("expenses[{i}].name"), MAX_NAME_LEN)
                .map_err(|e| e.with_code(ErrorCode::ExpenseInvalid))?;
            let amount = parse_non_negative_amount(&line.amount, &format!("expenses[{i}].amount"))
                .map_err(|e| e.with_code(ErrorCode::ExpenseInvalid))?;
            Ok(ExpenseLine {
                name: name.to_string(),
                amount,
            })
        })
        .collect()
}

/// Validate a creation request and compute the split
pub fn plan_game(input: &GameCreate) -> Result<GamePlan, AppError> {
    let date = parse_date(&input.date)?;
    validate_optional_text(&input.note, "note", MAX_NOTE_LEN)?;

    let expenses = validate_expenses(&input.expenses)?;
    let amount_san = input
        .amount_san
        .as_ref()
        .map(|a| parse_non_negative_amount(a, "amount_san"))
        .transpose()?
        .unwrap_or(0.0);
    let amount_water = input
        .amount_water
        .as_ref()
        .map(|a| parse_non_negative_amount(a, "amount_water"))
        .transpose()?
        .unwrap_or(0.0);

    if expenses.is_empty() && amount_san <= 0.0 && amount_water <= 0.0 {
        return Err(AppError::new(ErrorCode::GameCostRequired));
    }

    let amounts: Vec<f64> = expenses.iter().map(|e| e.amount).collect();
    let total_cost = game_cost(&amounts, amount_san, amount_water);

    let member_ids = dedup_ids(&input.member_ids);
    let guest_ids = dedup_ids(&input.guest_ids);
    let share = money::split_share(total_cost, member_ids.len() + guest_ids.len());

    Ok(GamePlan {
        date,
        note: input.note.as_deref().map(str::trim).unwrap_or_default().to_string(),
        expenses,
        amount_san,
        amount_water,
        member_ids,
        guest_ids,
        total_cost,
        share,
    })
}

/// Fund check: the fund must cover `required`
pub fn ensure_fund_covers(available: Decimal, required: Decimal) -> Result<(), AppError> {
    if money::covers(available, required) {
        Ok(())
    } else {
        Err(AppError::insufficient_funds(to_f64(available), to_f64(required)))
    }
}

/// Every id must name an active member
async fn ensure_members_selectable(pool: &PgPool, ids: &[i64]) -> ServiceResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: HashMap<i64, bool> = db::members::find_many(pool, ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m.is_active))
        .collect();
    for id in ids {
        match found.get(id) {
            None => {
                return Err(AppError::new(ErrorCode::MemberNotFound)
                    .with_detail("member_id", *id)
                    .into());
            }
            Some(false) => {
                return Err(AppError::new(ErrorCode::MemberInactive)
                    .with_detail("member_id", *id)
                    .into());
            }
            Some(true) => {}
        }
    }
    Ok(())
}

/// Every id must name an active, non-promoted guest
async fn ensure_guests_selectable(pool: &PgPool, ids: &[i64]) -> ServiceResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let mut found = HashMap::new();
    for row in db::guests::find_many(pool, ids).await? {
        let guest = Guest::try_from(row)?;
        found.insert(guest.id, guest.status);
    }
    for id in ids {
        match found.get(id) {
            None => {
                return Err(AppError::new(ErrorCode::GuestNotFound)
                    .with_detail("guest_id", *id)
                    .into());
            }
            Some(status) if !status.is_selectable() => {
                return Err(AppError::with_message(
                    ErrorCode::GuestInactive,
                    format!("Guest {id} cannot be selected for a game"),
                )
                .with_detail("guest_id", *id)
                .into());
            }
            Some(_) => {}
        }
    }
    Ok(())
}

pub async fn create_game(pool: &PgPool, input: &GameCreate) -> ServiceResult<GameCreated> {
    let plan = plan_game(input)?;
    ensure_members_selectable(pool, &plan.member_ids).await?;
    ensure_guests_selectable(pool, &plan.guest_ids).await?;

    // Not serialized with concurrent creations
    let club_fund = ledger::club_fund_balance(pool).await?;
    ensure_fund_covers(club_fund, plan.total_cost)?;

    let now = shared::util::now_millis();
    let game = Game {
        id: shared::util::snowflake_id(),
        date: plan.date,
        note: plan.note.clone(),
        amount_san: plan.amount_san,
        amount_water: plan.amount_water,
        created_at: now,
    };
    let share = to_f64(plan.share);

    let mut tx = pool.begin().await?;
    db::games::insert(&mut tx, &game).await?;
    for line in &plan.expenses {
        db::games::insert_expense(&mut tx, game.id, &line.name, line.amount).await?;
    }
    for member_id in &plan.member_ids {
        db::games::insert_member_link(&mut *tx, game.id, *member_id, now).await?;
        let payer = Payer::Member { id: *member_id };
        db::payments::insert_need_payment(&mut tx, game.id, payer, share, true, now).await?;
    }
    for guest_id in &plan.guest_ids {
        db::games::insert_guest_link(&mut tx, game.id, *guest_id, now).await?;
        let payer = Payer::Guest { id: *guest_id };
        db::payments::insert_need_payment(&mut tx, game.id, payer, share, false, now).await?;
    }
    tx.commit().await?;

    tracing::info!(
        game_id = game.id,
        date = %game.date,
        total_cost = %plan.total_cost,
        participants = plan.participant_count(),
        "Game created"
    );

    Ok(GameCreated {
        id: game.id,
        date: game.date,
        note: game.note,
        total_cost: to_f64(plan.total_cost),
        share,
        member_ids: plan.member_ids,
        guest_ids: plan.guest_ids,
        club_fund_after: to_f64(club_fund - plan.total_cost),
    })
}

/// Attach expense lines and participants to games
pub async fn load_details(pool: &PgPool, games: Vec<Game>) -> ServiceResult<Vec<GameDetail>> {
    let ids: Vec<i64> = games.iter().map(|g| g.id).collect();
    let mut expenses: HashMap<i64, Vec<_>> = HashMap::new();
    for e in db::games::expenses_for(pool, &ids).await? {
        expenses.entry(e.game_id).or_default().push(e);
    }
    let mut members: HashMap<i64, Vec<_>> = HashMap::new();
    for m in db::games::members_for(pool, &ids).await? {
        members.entry(m.game_id).or_default().push(m);
    }
    let mut guests: HashMap<i64, Vec<_>> = HashMap::new();
    for g in db::games::guests_for(pool, &ids).await? {
        guests.entry(g.game_id).or_default().push(g);
    }

    Ok(games
        .into_iter()
        .map(|game| {
            let expenses = expenses.remove(&game.id).unwrap_or_default();
            let amounts: Vec<f64> = expenses.iter().map(|e| e.amount).collect();
            let total_cost = to_f64(game_cost(&amounts, game.amount_san, game.amount_water));
            GameDetail {
                total_cost,
                expenses,
                members: members.remove(&game.id).unwrap_or_default(),
                guests: guests.remove(&game.id).unwrap_or_default(),
                game,
            }
        })
        .collect())
}

pub async fn list_games(
    pool: &PgPool,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> ServiceResult<Vec<GameDetail>> {
    let games = db::games::list(pool, from, to).await?;
    load_details(pool, games).await
}

async fn find_game(pool: &PgPool, id: i64) -> ServiceResult<Game> {
    db::games::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::GameNotFound).with_detail("game_id", id).into())
}

/// Edit date, note and (full replacement) expense lines
pub async fn update_game(pool: &PgPool, id: i64, input: &GameUpdate) -> ServiceResult<GameDetail> {
    let game = find_game(pool, id).await?;

    let date = input.date.as_deref().map(parse_date).transpose()?.unwrap_or(game.date);
    validate_optional_text(&input.note, "note", MAX_NOTE_LEN)?;
    let note = input
        .note
        .as_deref()
        .map(|n| n.trim().to_string())
        .unwrap_or_else(|| game.note.clone());

    let new_lines = input.expenses.as_deref().map(validate_expenses).transpose()?;

    if let Some(lines) = &new_lines {
        if lines.is_empty() && game.amount_san <= 0.0 && game.amount_water <= 0.0 {
            return Err(AppError::new(ErrorCode::GameCostRequired).into());
        }
        let current: Vec<f64> = db::games::expenses_for(pool, &[id])
            .await?
            .iter()
            .map(|e| e.amount)
            .collect();
        let old_cost = game_cost(&current, game.amount_san, game.amount_water);
        let amounts: Vec<f64> = lines.iter().map(|l| l.amount).collect();
        let new_cost = game_cost(&amounts, game.amount_san, game.amount_water);
        if new_cost > old_cost {
            // Fund as it would be without this game
            let fund_without = ledger::club_fund_balance(pool).await? + old_cost;
            ensure_fund_covers(fund_without, new_cost)?;
        }
    }

    let mut tx = pool.begin().await?;
    db::games::update_header(&mut tx, id, date, &note).await?;
    if let Some(lines) = &new_lines {
        db::games::delete_expenses(&mut tx, id).await?;
        for line in lines {
            db::games::insert_expense(&mut tx, id, &line.name, line.amount).await?;
        }
    }
    tx.commit().await?;

    let updated = Game { date, note, ..game };
    let mut details = load_details(pool, vec![updated]).await?;
    details
        .pop()
        .ok_or_else(|| AppError::new(ErrorCode::GameNotFound).into())
}

pub async fn delete_game(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;
    let deleted = db::games::delete_cascade(&mut tx, id).await?;
    if !deleted {
        return Err(AppError::new(ErrorCode::GameNotFound)
            .with_detail("game_id", id)
            .into());
    }
    tx.commit().await?;
    tracing::info!(game_id = id, "Game deleted");
    Ok(())
}

pub async fn attendance(pool: &PgPool, game_id: i64) -> ServiceResult<Vec<GameParticipant>> {
    find_game(pool, game_id).await?;
    Ok(db::games::members_for(pool, &[game_id]).await?)
}

/// Check a member in to an existing game; no payment is created
pub async fn check_in(pool: &PgPool, game_id: i64, member_id: i64) -> ServiceResult<AttendanceCreated> {
    find_game(pool, game_id).await?;
    db::members::find_by_id(pool, member_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound).with_detail("member_id", member_id))?;

    let now = shared::util::now_millis();
    match db::games::insert_member_link(pool, game_id, member_id, now).await {
        Ok(()) => Ok(AttendanceCreated { game_id, member_id }),
        Err(e) if is_unique_violation(&e) => Err(AppError::new(ErrorCode::AttendanceExists)
            .with_detail("game_id", game_id)
            .with_detail("member_id", member_id)
            .into()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::AmountInput;

    fn create_input() -> GameCreate {
        GameCreate {
            date: "2025-03-09".into(),
            note: Some(" Sunday ".into()),
            expenses: vec![
                ExpenseInput {
                    name: "Court".into(),
                    amount: AmountInput::Text("150,000".into()),
                },
                ExpenseInput {
                    name: "Shuttlecocks".into(),
                    amount: AmountInput::Number(50_000.0),
                },
            ],
            amount_san: None,
            amount_water: None,
            member_ids: vec![1, 2, 1],
            guest_ids: vec![9],
        }
    }

    #[test]
    fn test_plan_splits_cost_per_participant() {
        let plan = plan_game(&create_input()).unwrap();
        assert_eq!(plan.member_ids, vec![1, 2]);
        assert_eq!(plan.guest_ids, vec![9]);
        assert_eq!(plan.note, "Sunday");
        assert_eq!(plan.total_cost, Decimal::from(200_000));
        assert_eq!(to_f64(plan.share), 66_666.67);
        let sum = plan.share * Decimal::from(plan.participant_count());
        assert!((sum - plan.total_cost).abs() <= Decimal::new(3, 2));
    }

    #[test]
    fn test_plan_without_participants() {
        let mut input = create_input();
        input.member_ids.clear();
        input.guest_ids.clear();
        let plan = plan_game(&input).unwrap();
        assert_eq!(plan.participant_count(), 0);
        assert_eq!(plan.share, Decimal::ZERO);
    }

    #[test]
    fn test_plan_uses_legacy_amounts_without_lines() {
        let mut input = create_input();
        input.expenses.clear();
        input.amount_san = Some(AmountInput::Number(120_000.0));
        input.amount_water = Some(AmountInput::Text("30,000".into()));
        let plan = plan_game(&input).unwrap();
        assert_eq!(plan.total_cost, Decimal::from(150_000));
    }

    #[test]
    fn test_plan_requires_a_cost() {
        let mut input = create_input();
        input.expenses.clear();
        let err = plan_game(&input).unwrap_err();
        assert_eq!(err.code, ErrorCode::GameCostRequired);
    }

    #[test]
    fn test_plan_rejects_bad_expense_lines() {
        let mut input = create_input();
        input.expenses[1].name = "  ".into();
        let err = plan_game(&input).unwrap_err();
        assert_eq!(err.code, ErrorCode::ExpenseInvalid);

        let mut input = create_input();
        input.expenses[0].amount = AmountInput::Number(-5.0);
        assert_eq!(plan_game(&input).unwrap_err().code, ErrorCode::ExpenseInvalid);

        let mut input = create_input();
        input.expenses[0].amount = AmountInput::Text("abc".into());
        assert_eq!(plan_game(&input).unwrap_err().code, ErrorCode::ExpenseInvalid);
    }

    #[test]
    fn test_plan_rejects_bad_date() {
        let mut input = create_input();
        input.date = "09/03/2025".into();
        assert_eq!(plan_game(&input).unwrap_err().code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_zero_cost_line_is_allowed() {
        let mut input = create_input();
        input.expenses = vec![ExpenseInput {
            name: "Free court".into(),
            amount: AmountInput::Number(0.0),
        }];
        let plan = plan_game(&input).unwrap();
        assert_eq!(plan.total_cost, Decimal::ZERO);
    }

    #[test]
    fn test_game_cost_prefers_lines() {
        assert_eq!(game_cost(&[10.0, 20.0], 100.0, 100.0), Decimal::from(30));
        assert_eq!(game_cost(&[], 100.0, 50.0), Decimal::from(150));
    }

    #[test]
    fn test_fund_check_reports_shortfall() {
        assert!(ensure_fund_covers(Decimal::from(200_000), Decimal::from(200_000)).is_ok());
        let err = ensure_fund_covers(Decimal::from(150_000), Decimal::from(200_000)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientFunds);
        let details = err.details.unwrap();
        assert_eq!(details.get("shortfall").unwrap(), 50_000.0);
    }
}
