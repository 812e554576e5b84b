//! Ledger flows against a real PostgreSQL database.
//!
//! Each test gets a fresh database with the crate migrations applied
//! (`DATABASE_URL` must point at a server the test user may create
//! databases on).

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AmountInput, DepositCreate, ExpenseInput, GameCreate, GuestStatus, Member, MemberCreate,
    PaymentResolution,
};
use sqlx::PgPool;

use club_server::db;
use club_server::error::ServiceError;
use club_server::services::{deposits, games, ledger, payments, roster};

const TZ: chrono_tz::Tz = chrono_tz::Asia::Ho_Chi_Minh;

async fn member(pool: &PgPool, name: &str) -> Member {
    roster::create_member(
        pool,
        &MemberCreate {
            name: name.into(),
            color: None,
            letter: None,
        },
    )
    .await
    .unwrap()
}

async fn deposit(pool: &PgPool, member_id: i64, amount: f64) {
    deposits::create_deposit(
        pool,
        TZ,
        &DepositCreate {
            member_id: Some(member_id),
            date: Some("2025-03-01".into()),
            amount: AmountInput::Number(amount),
        },
    )
    .await
    .unwrap();
}

fn game_input(cost: f64, member_ids: Vec<i64>, guest_ids: Vec<i64>) -> GameCreate {
    GameCreate {
        date: "2025-03-02".into(),
        note: None,
        expenses: vec![ExpenseInput {
            name: "Court".into(),
            amount: AmountInput::Number(cost),
        }],
        amount_san: None,
        amount_water: None,
        member_ids,
        guest_ids,
    }
}

fn app_error(err: ServiceError) -> AppError {
    err.into()
}

async fn count(pool: &PgPool, sql: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(sql).fetch_one(pool).await.unwrap();
    n
}

#[sqlx::test(migrations = "./migrations")]
async fn game_split_covers_and_delete_restore_the_fund(pool: PgPool) {
    let treasurer = member(&pool, "Treasurer").await;
    let an = member(&pool, "An").await;
    let binh = member(&pool, "Binh").await;
    let guest = roster::create_guest(&pool, "Visitor").await.unwrap();
    deposit(&pool, treasurer.id, 500_000.0).await;

    let created = games::create_game(&pool, &game_input(200_000.0, vec![an.id, binh.id], vec![guest.id]))
        .await
        .unwrap();
    assert_eq!(created.total_cost, 200_000.0);
    assert_eq!(created.share, 66_666.67);
    assert_eq!(created.club_fund_after, 300_000.0);
    assert_eq!(ledger::club_fund_balance(&pool).await.unwrap(), Decimal::from(300_000));

    let entries = payments::list_payments(&pool).await.unwrap();
    assert_eq!(entries.len(), 3);
    for entry in &entries {
        assert_eq!(entry.row.amount, 66_666.67);
        assert_eq!(entry.row.is_paid, entry.row.member_id.is_some());
    }
    let guest_payment = entries
        .iter()
        .find(|e| e.row.guest_id == Some(guest.id))
        .unwrap();

    let resolved = payments::resolve_payment(
        &pool,
        guest_payment.row.id,
        &PaymentResolution::MemberCover {
            member_ids: vec![an.id, binh.id],
        },
    )
    .await
    .unwrap();
    assert!(resolved.is_paid);
    assert!(!resolved.paid_from_club_fund);
    let mut amounts: Vec<f64> = resolved.covers.iter().map(|c| c.amount).collect();
    amounts.sort_by(f64::total_cmp);
    assert_eq!(amounts, vec![33_334.0, 33_334.0]);

    // Σ deposits − Σ paid payments − Σ covers
    assert_eq!(ledger::member_balance(&pool, an.id).await.unwrap(), -100_000.67);
    assert_eq!(ledger::member_balance(&pool, binh.id).await.unwrap(), -100_000.67);
    assert_eq!(ledger::member_balance(&pool, treasurer.id).await.unwrap(), 500_000.0);
    // Covers move money between members, never out of the fund
    assert_eq!(ledger::club_fund_balance(&pool).await.unwrap(), Decimal::from(300_000));

    games::delete_game(&pool, created.id).await.unwrap();
    assert_eq!(ledger::club_fund_balance(&pool).await.unwrap(), Decimal::from(500_000));
    assert_eq!(ledger::member_balance(&pool, an.id).await.unwrap(), 0.0);
    for table in ["need_payments", "payment_covers", "game_members", "game_guests", "game_expenses"] {
        assert_eq!(count(&pool, &format!("SELECT COUNT(*) FROM {table}")).await, 0, "{table}");
    }

    let err = app_error(games::delete_game(&pool, created.id).await.unwrap_err());
    assert_eq!(err.code, ErrorCode::GameNotFound);
}

#[sqlx::test(migrations = "./migrations")]
async fn each_game_is_counted_once_in_the_fund(pool: PgPool) {
    let lan = member(&pool, "Lan").await;
    deposit(&pool, lan.id, 1_000_000.0).await;

    // Expense lines win over the legacy columns when both are present
    let mut mixed = game_input(200_000.0, vec![lan.id], vec![]);
    mixed.amount_san = Some(AmountInput::Number(90_000.0));
    mixed.amount_water = Some(AmountInput::Number(10_000.0));
    games::create_game(&pool, &mixed).await.unwrap();

    // Legacy-only game: san + water
    let legacy = GameCreate {
        expenses: vec![],
        amount_san: Some(AmountInput::Number(120_000.0)),
        amount_water: Some(AmountInput::Number(30_000.0)),
        ..game_input(0.0, vec![lan.id], vec![])
    };
    games::create_game(&pool, &legacy).await.unwrap();

    let stats = ledger::club_stats(&pool, 100_000.0).await.unwrap();
    assert_eq!(stats.total_game_costs, 350_000.0);
    assert_eq!(stats.club_fund, 650_000.0);
    assert!(!stats.is_low_fund);
}

#[sqlx::test(migrations = "./migrations")]
async fn missing_expense_table_falls_back_to_legacy_amounts(pool: PgPool) {
    let lan = member(&pool, "Lan").await;
    deposit(&pool, lan.id, 400_000.0).await;
    let legacy = GameCreate {
        expenses: vec![],
        amount_san: Some(AmountInput::Number(100_000.0)),
        amount_water: Some(AmountInput::Number(20_000.0)),
        ..game_input(0.0, vec![lan.id], vec![])
    };
    games::create_game(&pool, &legacy).await.unwrap();

    sqlx::query("DROP TABLE game_expenses").execute(&pool).await.unwrap();

    let costs = ledger::game_costs(&pool, None, None).await.unwrap();
    assert_eq!(costs, Decimal::from(120_000));
    assert_eq!(ledger::club_fund_balance(&pool).await.unwrap(), Decimal::from(280_000));
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_check_in_is_a_conflict(pool: PgPool) {
    let lan = member(&pool, "Lan").await;
    let minh = member(&pool, "Minh").await;
    deposit(&pool, lan.id, 100_000.0).await;
    let created = games::create_game(&pool, &game_input(50_000.0, vec![lan.id], vec![]))
        .await
        .unwrap();

    let err = app_error(games::check_in(&pool, created.id, lan.id).await.unwrap_err());
    assert_eq!(err.code, ErrorCode::AttendanceExists);
    assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

    games::check_in(&pool, created.id, minh.id).await.unwrap();
    let err = app_error(games::check_in(&pool, created.id, minh.id).await.unwrap_err());
    assert_eq!(err.code, ErrorCode::AttendanceExists);

    let present = games::attendance(&pool, created.id).await.unwrap();
    assert_eq!(present.len(), 2);
    // Check-in does not bill anyone
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM need_payments").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn game_beyond_the_fund_reports_the_shortfall(pool: PgPool) {
    let lan = member(&pool, "Lan").await;
    deposit(&pool, lan.id, 300_000.0).await;

    let err = app_error(
        games::create_game(&pool, &game_input(400_000.0, vec![lan.id], vec![]))
            .await
            .unwrap_err(),
    );
    assert_eq!(err.code, ErrorCode::InsufficientFunds);
    let details = err.details.unwrap();
    assert_eq!(details["club_fund"], 300_000.0);
    assert_eq!(details["required"], 400_000.0);
    assert_eq!(details["shortfall"], 100_000.0);

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM games").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn promoted_guest_stays_locked(pool: PgPool) {
    let guest = roster::create_guest(&pool, "Visitor").await.unwrap();
    let member = roster::promote_guest(&pool, guest.id).await.unwrap();
    assert_eq!(member.name, "Visitor");

    let err = app_error(roster::rename_guest(&pool, guest.id, "Other").await.unwrap_err());
    assert_eq!(err.code, ErrorCode::GuestPromoted);
    let err = app_error(roster::set_guest_active(&pool, guest.id, true).await.unwrap_err());
    assert_eq!(err.code, ErrorCode::GuestPromoted);
    let err = app_error(roster::promote_guest(&pool, guest.id).await.unwrap_err());
    assert_eq!(err.code, ErrorCode::GuestAlreadyPromoted);

    // A write racing the promotion finds no row to update
    assert!(db::guests::rename(&pool, guest.id, "Other").await.unwrap().is_none());
    assert!(
        db::guests::set_status(&pool, guest.id, GuestStatus::Active)
            .await
            .unwrap()
            .is_none()
    );

    let row = db::guests::find_by_id(&pool, guest.id).await.unwrap().unwrap();
    assert_eq!(row.name, "Visitor");
    assert_eq!(row.status, "promoted");
    assert_eq!(row.promoted_to_member_id, Some(member.id));
}
