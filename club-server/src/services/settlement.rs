//! Settlement reporter and periods

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use shared::error::{AppError, ErrorCode};
use shared::models::{SettlementPeriod, SettlementPeriodCreate, SettlementQuery, SettlementReport};
use sqlx::PgPool;

use crate::db;
use crate::error::ServiceResult;
use crate::money::{to_decimal, to_f64};
use crate::services::ledger;
use crate::time::{parse_date, today};
use crate::validation::{MAX_NAME_LEN, non_blank, validate_optional_text};

fn ensure_ordered(from: NaiveDate, to: NaiveDate) -> Result<(), AppError> {
    if from > to {
        return Err(AppError::with_message(
            ErrorCode::DateRangeInvalid,
            format!("from_date ({from}) must not be after to_date ({to})"),
        ));
    }
    Ok(())
}

/// Explicit range from the query, if one was given
pub fn explicit_range(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Option<(NaiveDate, NaiveDate)>, AppError> {
    match (from, to) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) => {
            let from = parse_date(from)?;
            let to = parse_date(to)?;
            ensure_ordered(from, to)?;
            Ok(Some((from, to)))
        }
        _ => Err(AppError::with_message(
            ErrorCode::DateRangeInvalid,
            "Provide both from_date and to_date, or neither",
        )),
    }
}

/// Range used when no period and no dates are given: everything since the
/// last settled period (or since the first recorded activity) up to today
pub fn default_range(
    latest_period_end: Option<NaiveDate>,
    earliest_activity: Option<NaiveDate>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let from = match latest_period_end {
        Some(end) => end + Duration::days(1),
        None => earliest_activity.unwrap_or(today),
    };
    (from.min(today), today)
}

pub async fn settlement_report(
    pool: &PgPool,
    tz: Tz,
    query: &SettlementQuery,
) -> ServiceResult<SettlementReport> {
    // Validate the explicit dates before touching the database
    let explicit = explicit_range(query.from_date.as_deref(), query.to_date.as_deref())?;

    let (from, to, name) = if let Some(period_id) = query.period_id {
        let period = db::periods::find_by_id(pool, period_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::PeriodNotFound).with_detail("period_id", period_id)
            })?;
        (period.from_date, period.to_date, period.name)
    } else if let Some((from, to)) = explicit {
        (from, to, None)
    } else {
        let latest = db::periods::latest(pool).await?;
        let earliest = match latest {
            Some(_) => None,
            None => db::ledger::earliest_activity_date(pool).await?,
        };
        let (from, to) = default_range(latest.map(|p| p.to_date), earliest, today(tz));
        (from, to, None)
    };

    let total_deposits = db::ledger::deposits_total(pool, Some(from), Some(to)).await?;
    let total_spending = ledger::total_spending_in_range(pool, from, to).await?;
    let opening_balance = match from.pred_opt() {
        Some(day_before) => ledger::club_fund_balance_at(pool, day_before).await?,
        None => rust_decimal::Decimal::ZERO,
    };
    let balance_at_end = ledger::club_fund_balance_at(pool, to).await?;
    let per_member_deposits = db::ledger::deposits_by_member(pool, from, to).await?;

    Ok(SettlementReport {
        from_date: from,
        to_date: to,
        name,
        total_deposits: to_f64(to_decimal(total_deposits)),
        total_spending: to_f64(total_spending),
        opening_balance: to_f64(opening_balance),
        balance_at_end: to_f64(balance_at_end),
        per_member_deposits,
    })
}

pub async fn create_period(
    pool: &PgPool,
    input: &SettlementPeriodCreate,
) -> ServiceResult<SettlementPeriod> {
    let from = parse_date(&input.from_date)?;
    let to = parse_date(&input.to_date)?;
    ensure_ordered(from, to)?;
    validate_optional_text(&input.name, "name", MAX_NAME_LEN)?;
    let name = non_blank(&input.name);

    let period = db::periods::create(
        pool,
        shared::util::snowflake_id(),
        from,
        to,
        name.as_deref(),
        shared::util::now_millis(),
    )
    .await?;
    tracing::info!(period_id = period.id, from = %from, to = %to, "Settlement period created");
    Ok(period)
}

pub async fn list_periods(pool: &PgPool) -> ServiceResult<Vec<SettlementPeriod>> {
    Ok(db::periods::list(pool).await?)
}

pub async fn latest_period(pool: &PgPool) -> ServiceResult<Option<SettlementPeriod>> {
    Ok(db::periods::latest(pool).await?)
}

pub async fn delete_period(pool: &PgPool, id: i64) -> ServiceResult<()> {
    if !db::periods::delete(pool, id).await? {
        return Err(AppError::new(ErrorCode::PeriodNotFound)
            .with_detail("period_id", id)
            .into());
    }
    tracing::info!(period_id = id, "Settlement period deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_explicit_range() {
        assert_eq!(explicit_range(None, None).unwrap(), None);
        assert_eq!(
            explicit_range(Some("2025-01-01"), Some("2025-01-31")).unwrap(),
            Some((d(2025, 1, 1), d(2025, 1, 31)))
        );
        assert_eq!(
            explicit_range(Some("2025-01-01"), Some("2025-01-01")).unwrap(),
            Some((d(2025, 1, 1), d(2025, 1, 1)))
        );
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = explicit_range(Some("2025-02-01"), Some("2025-01-01")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DateRangeInvalid);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_half_range_rejected() {
        let err = explicit_range(Some("2025-02-01"), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::DateRangeInvalid);
        assert!(explicit_range(None, Some("2025-02-01")).is_err());
    }

    #[test]
    fn test_default_range_after_latest_period() {
        let today = d(2025, 3, 20);
        assert_eq!(
            default_range(Some(d(2025, 2, 28)), None, today),
            (d(2025, 3, 1), today)
        );
        // Period ending today: the open range collapses to today
        assert_eq!(default_range(Some(today), None, today), (today, today));
    }

    #[test]
    fn test_default_range_without_periods() {
        let today = d(2025, 3, 20);
        assert_eq!(
            default_range(None, Some(d(2024, 11, 2)), today),
            (d(2024, 11, 2), today)
        );
        assert_eq!(default_range(None, None, today), (today, today));
    }
}
