//! Club fund deposits

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::error::{AppError, ErrorCode};
use shared::models::{AmountInput, Deposit, DepositCreate, DepositQuery, DepositWithMember};
use sqlx::PgPool;

use crate::db;
use crate::error::ServiceResult;
use crate::money::{to_decimal, to_f64};
use crate::time::{parse_date, today};
use crate::validation::parse_non_negative_amount;

/// Deposits must be strictly positive
pub fn parse_deposit_amount(input: &AmountInput) -> Result<f64, AppError> {
    let amount = parse_non_negative_amount(input, "amount")
        .map_err(|e| e.with_code(ErrorCode::DepositAmountInvalid))?;
    let amount = to_f64(to_decimal(amount));
    if amount <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::DepositAmountInvalid,
            "amount must be greater than zero",
        )
        .with_detail("field", "amount"));
    }
    Ok(amount)
}

fn optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_date)
        .transpose()
}

pub async fn list_deposits(pool: &PgPool, query: &DepositQuery) -> ServiceResult<Vec<DepositWithMember>> {
    let from = optional_date(query.from_date.as_deref())?;
    let to = optional_date(query.to_date.as_deref())?;
    Ok(db::deposits::list(pool, from, to, query.member_id).await?)
}

pub async fn create_deposit(pool: &PgPool, tz: Tz, input: &DepositCreate) -> ServiceResult<Deposit> {
    let amount = parse_deposit_amount(&input.amount)?;
    let date = optional_date(input.date.as_deref())?.unwrap_or_else(|| today(tz));

    if let Some(member_id) = input.member_id {
        db::members::find_by_id(pool, member_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound).with_detail("member_id", member_id))?;
    }

    let deposit = db::deposits::create(
        pool,
        shared::util::snowflake_id(),
        input.member_id,
        date,
        amount,
        shared::util::now_millis(),
    )
    .await?;
    tracing::info!(deposit_id = deposit.id, member_id = ?deposit.member_id, amount, "Deposit recorded");
    Ok(deposit)
}

pub async fn delete_deposit(pool: &PgPool, id: i64) -> ServiceResult<()> {
    if !db::deposits::delete(pool, id).await? {
        return Err(AppError::new(ErrorCode::DepositNotFound)
            .with_detail("deposit_id", id)
            .into());
    }
    tracing::info!(deposit_id = id, "Deposit deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_amount_accepts_text() {
        assert_eq!(
            parse_deposit_amount(&AmountInput::Text("1,500,000".into())).unwrap(),
            1_500_000.0
        );
        assert_eq!(parse_deposit_amount(&AmountInput::Number(0.125)).unwrap(), 0.13);
    }

    #[test]
    fn test_deposit_amount_must_be_positive() {
        for input in [
            AmountInput::Number(0.0),
            AmountInput::Number(-5.0),
            AmountInput::Number(0.001),
            AmountInput::Text("abc".into()),
            AmountInput::Text("".into()),
        ] {
            let err = parse_deposit_amount(&input).unwrap_err();
            assert_eq!(err.code, ErrorCode::DepositAmountInvalid, "{input:?}");
        }
    }

    #[test]
    fn test_optional_date() {
        assert_eq!(optional_date(None).unwrap(), None);
        assert_eq!(optional_date(Some("  ")).unwrap(), None);
        assert_eq!(
            optional_date(Some("2025-03-01")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert!(optional_date(Some("03/01/2025")).is_err());
    }
}
