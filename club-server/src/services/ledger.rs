//! Balance calculator
//!
//! Balances are never stored. They are aggregated from deposits, paid
//! payments and covers on every read.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::ClubStats;
use sqlx::PgPool;

use crate::db;
use crate::error::{ServiceResult, is_undefined_table};
use crate::money::{to_decimal, to_f64};

/// Inputs of a member's balance
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemberTotals {
    pub deposits: Decimal,
    pub paid: Decimal,
    pub covers: Decimal,
}

impl MemberTotals {
    pub fn from_f64(deposits: f64, paid: f64, covers: f64) -> Self {
        Self {
            deposits: to_decimal(deposits),
            paid: to_decimal(paid),
            covers: to_decimal(covers),
        }
    }

    /// Σ deposits − Σ paid payments − Σ covers; may be negative
    pub fn balance(&self) -> Decimal {
        self.deposits - self.paid - self.covers
    }

    /// Money this member has spent: paid game shares plus covers
    pub fn spending(&self) -> Decimal {
        self.paid + self.covers
    }
}

/// Inputs of the club fund
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClubTotals {
    pub deposits: Decimal,
    pub game_costs: Decimal,
}

impl ClubTotals {
    /// Σ deposits − Σ game costs, independent of payment status
    pub fn balance(&self) -> Decimal {
        self.deposits - self.game_costs
    }
}

pub async fn member_totals(pool: &PgPool, member_id: i64) -> ServiceResult<MemberTotals> {
    let (deposits, paid, covers) = db::ledger::member_totals(pool, member_id).await?;
    Ok(MemberTotals::from_f64(deposits, paid, covers))
}

/// Balance of one member; an unknown id yields 0
pub async fn member_balance(pool: &PgPool, member_id: i64) -> ServiceResult<f64> {
    Ok(to_f64(member_totals(pool, member_id).await?.balance()))
}

/// Game cost in the range, falling back to the legacy columns when the
/// expense table does not exist
pub async fn game_costs(
    pool: &PgPool,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> ServiceResult<Decimal> {
    match db::ledger::game_costs_total(pool, from, to).await {
        Ok(total) => Ok(to_decimal(total)),
        Err(e) if is_undefined_table(&e) => {
            tracing::warn!(error = %e, "Expense table missing, using legacy game amounts");
            let total = db::ledger::legacy_game_costs_total(pool, from, to).await?;
            Ok(to_decimal(total))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn club_totals(
    pool: &PgPool,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> ServiceResult<ClubTotals> {
    let deposits = db::ledger::deposits_total(pool, from, to).await?;
    let game_costs = game_costs(pool, from, to).await?;
    Ok(ClubTotals {
        deposits: to_decimal(deposits),
        game_costs,
    })
}

pub async fn club_fund_balance(pool: &PgPool) -> ServiceResult<Decimal> {
    Ok(club_totals(pool, None, None).await?.balance())
}

/// Club fund at the end of `date`
pub async fn club_fund_balance_at(pool: &PgPool, date: NaiveDate) -> ServiceResult<Decimal> {
    Ok(club_totals(pool, None, Some(date)).await?.balance())
}

pub async fn total_spending_in_range(
    pool: &PgPool,
    from: NaiveDate,
    to: NaiveDate,
) -> ServiceResult<Decimal> {
    game_costs(pool, Some(from), Some(to)).await
}

/// Dashboard figures
pub async fn club_stats(pool: &PgPool, low_fund_threshold: f64) -> ServiceResult<ClubStats> {
    let totals = club_totals(pool, None, None).await?;
    Ok(stats_from_totals(&totals, low_fund_threshold))
}

pub fn stats_from_totals(totals: &ClubTotals, low_fund_threshold: f64) -> ClubStats {
    let balance = totals.balance();
    ClubStats {
        club_fund: to_f64(balance),
        total_deposits: to_f64(totals.deposits),
        total_game_costs: to_f64(totals.game_costs),
        is_low_fund: balance < to_decimal(low_fund_threshold),
        is_empty_fund: balance <= Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_without_activity_has_zero_balance() {
        assert_eq!(MemberTotals::default().balance(), Decimal::ZERO);
    }

    #[test]
    fn test_member_balance_formula() {
        let totals = MemberTotals::from_f64(500_000.0, 66_666.67, 33_334.0);
        assert_eq!(to_f64(totals.balance()), 399_999.33);
        assert_eq!(to_f64(totals.spending()), 100_000.67);
    }

    #[test]
    fn test_member_balance_may_be_negative() {
        let totals = MemberTotals::from_f64(0.0, 50_000.0, 0.0);
        assert_eq!(to_f64(totals.balance()), -50_000.0);
    }

    #[test]
    fn test_club_balance_and_flags() {
        let totals = ClubTotals {
            deposits: Decimal::from(500_000),
            game_costs: Decimal::from(200_000),
        };
        let stats = stats_from_totals(&totals, 100_000.0);
        assert_eq!(stats.club_fund, 300_000.0);
        assert!(!stats.is_low_fund);
        assert!(!stats.is_empty_fund);

        let low = ClubTotals {
            deposits: Decimal::from(150_000),
            game_costs: Decimal::from(60_000),
        };
        let stats = stats_from_totals(&low, 100_000.0);
        assert!(stats.is_low_fund);
        assert!(!stats.is_empty_fund);

        let empty = ClubTotals {
            deposits: Decimal::from(100_000),
            game_costs: Decimal::from(100_000),
        };
        let stats = stats_from_totals(&empty, 100_000.0);
        assert!(stats.is_low_fund);
        assert!(stats.is_empty_fund);
    }
}
