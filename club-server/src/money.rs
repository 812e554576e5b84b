//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.

use rust_decimal::prelude::*;

/// Rounding for stored amounts (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest single amount accepted from a form
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Sum f64 amounts in Decimal
pub fn sum(values: impl IntoIterator<Item = f64>) -> Decimal {
    values.into_iter().map(to_decimal).sum()
}

/// Equal share of a game's cost, rounded for storage
///
/// Returns zero when there are no participants.
pub fn split_share(total: Decimal, participants: usize) -> Decimal {
    if participants == 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(participants))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Per-member part of a covered payment: `ceil(amount / members)` in whole units
///
/// The covers together may exceed the original amount by up to `members - 1`.
pub fn cover_share(amount: Decimal, members: usize) -> Decimal {
    if members == 0 {
        return Decimal::ZERO;
    }
    (amount / Decimal::from(members)).ceil()
}

/// `a >= b` within [`MONEY_TOLERANCE`]
pub fn covers(available: Decimal, required: Decimal) -> bool {
    available + MONEY_TOLERANCE > required
}
