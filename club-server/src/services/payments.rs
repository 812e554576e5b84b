//! Payment resolution
//!
//! ```text
//! Unpaid ──► PaidByPayer
//!        ──► ClubFund        (guest only)
//!        ──► MemberCover     (guest only)
//! any    ──► Unpaid
//! ```
//!
//! Every transition drops the previous cover rows first.

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{NeedPaymentRow, Payer, PaymentEntry, PaymentResolution, PaymentResolved};
use sqlx::PgPool;

use crate::db;
use crate::error::ServiceResult;
use crate::money::{cover_share, to_decimal, to_f64};
use crate::validation::dedup_ids;

/// Target state of a payment after a resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionPlan {
    pub is_paid: bool,
    pub paid_from_club_fund: bool,
    /// (member_id, amount)
    pub covers: Vec<(i64, Decimal)>,
}

/// Check the resolution against the payer and compute the new state
pub fn plan_resolution(
    payment: &NeedPaymentRow,
    payer: &Payer,
    resolution: &PaymentResolution,
) -> Result<ResolutionPlan, AppError> {
    if !resolution.allowed_for(payer) {
        return Err(AppError::with_message(
            ErrorCode::PaymentResolutionInvalid,
            "Member payments can only be marked paid or unpaid",
        )
        .with_detail("payment_id", payment.id));
    }

    let plan = match resolution {
        PaymentResolution::Unpaid => ResolutionPlan {
            is_paid: false,
            paid_from_club_fund: false,
            covers: Vec::new(),
        },
        PaymentResolution::PaidByPayer => ResolutionPlan {
            is_paid: true,
            paid_from_club_fund: false,
            covers: Vec::new(),
        },
        PaymentResolution::ClubFund => ResolutionPlan {
            is_paid: true,
            paid_from_club_fund: true,
            covers: Vec::new(),
        },
        PaymentResolution::MemberCover { member_ids } => {
            let member_ids = dedup_ids(member_ids);
            if member_ids.is_empty() {
                return Err(AppError::with_message(
                    ErrorCode::PaymentResolutionInvalid,
                    "Select at least one member to cover this payment",
                ));
            }
            let share = cover_share(to_decimal(payment.amount), member_ids.len());
            ResolutionPlan {
                is_paid: true,
                paid_from_club_fund: false,
                covers: member_ids.into_iter().map(|id| (id, share)).collect(),
            }
        }
    };
    Ok(plan)
}

pub async fn list_payments(pool: &PgPool) -> ServiceResult<Vec<PaymentEntry>> {
    let rows = db::payments::list(pool).await?;
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut covers: HashMap<i64, Vec<_>> = HashMap::new();
    for cover in db::payments::covers_for(pool, &ids).await? {
        covers.entry(cover.payment_id).or_default().push(cover);
    }
    Ok(rows
        .into_iter()
        .map(|row| PaymentEntry {
            covers: covers.remove(&row.id).unwrap_or_default(),
            row,
        })
        .collect())
}

pub async fn resolve_payment(
    pool: &PgPool,
    id: i64,
    resolution: &PaymentResolution,
) -> ServiceResult<PaymentResolved> {
    let mut tx = pool.begin().await?;

    let payment = db::payments::find_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound).with_detail("payment_id", id))?;
    let payer = Payer::from_columns(payment.member_id, payment.guest_id).ok_or_else(|| {
        AppError::internal(format!("Payment {id} has no single payer"))
    })?;

    let plan = plan_resolution(&payment, &payer, resolution)?;

    if !plan.covers.is_empty() {
        let ids: Vec<i64> = plan.covers.iter().map(|(m, _)| *m).collect();
        let found = db::members::find_many(&mut *tx, &ids).await?;
        if let Some(missing) = ids.iter().find(|id| !found.iter().any(|m| m.id == **id)) {
            return Err(AppError::new(ErrorCode::MemberNotFound)
                .with_detail("member_id", *missing)
                .into());
        }
    }

    let now = shared::util::now_millis();
    db::payments::delete_covers(&mut tx, id).await?;
    for (member_id, amount) in &plan.covers {
        db::payments::insert_cover(&mut tx, id, *member_id, to_f64(*amount), now).await?;
    }
    db::payments::set_state(&mut tx, id, plan.is_paid, plan.paid_from_club_fund).await?;
    let covers = db::payments::covers_for(&mut *tx, &[id]).await?;
    tx.commit().await?;

    tracing::info!(payment_id = id, resolution = ?resolution, "Payment resolved");

    Ok(PaymentResolved {
        id,
        is_paid: plan.is_paid,
        paid_from_club_fund: plan.paid_from_club_fund,
        covers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest_payment(amount: f64) -> (NeedPaymentRow, Payer) {
        let row = NeedPaymentRow {
            id: 10,
            game_id: 1,
            member_id: None,
            guest_id: Some(5),
            amount,
            is_paid: false,
            paid_from_club_fund: false,
            created_at: 0,
        };
        (row, Payer::Guest { id: 5 })
    }

    #[test]
    fn test_cover_splits_rounding_up() {
        let (row, payer) = guest_payment(100_000.0);
        let plan = plan_resolution(
            &row,
            &payer,
            &PaymentResolution::MemberCover {
                member_ids: vec![1, 2, 3, 2],
            },
        )
        .unwrap();
        assert!(plan.is_paid);
        assert!(!plan.paid_from_club_fund);
        assert_eq!(plan.covers.len(), 3);
        assert!(plan.covers.iter().all(|(_, a)| *a == Decimal::from(33_334)));
        let total: Decimal = plan.covers.iter().map(|(_, a)| *a).sum();
        assert!(total - Decimal::from(100_000) <= Decimal::from(2));
    }

    #[test]
    fn test_cover_requires_members() {
        let (row, payer) = guest_payment(100_000.0);
        let err = plan_resolution(
            &row,
            &payer,
            &PaymentResolution::MemberCover { member_ids: vec![] },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentResolutionInvalid);
    }

    #[test]
    fn test_club_fund_resolution() {
        let (row, payer) = guest_payment(66_666.67);
        let plan = plan_resolution(&row, &payer, &PaymentResolution::ClubFund).unwrap();
        assert_eq!(
            plan,
            ResolutionPlan {
                is_paid: true,
                paid_from_club_fund: true,
                covers: vec![],
            }
        );
    }

    #[test]
    fn test_back_to_unpaid_clears_everything() {
        let (row, payer) = guest_payment(66_666.67);
        let plan = plan_resolution(&row, &payer, &PaymentResolution::Unpaid).unwrap();
        assert!(!plan.is_paid);
        assert!(!plan.paid_from_club_fund);
        assert!(plan.covers.is_empty());
    }

    #[test]
    fn test_member_payment_cannot_use_club_fund() {
        let row = NeedPaymentRow {
            id: 11,
            game_id: 1,
            member_id: Some(1),
            guest_id: None,
            amount: 50_000.0,
            is_paid: true,
            paid_from_club_fund: false,
            created_at: 0,
        };
        let payer = Payer::Member { id: 1 };
        let err = plan_resolution(&row, &payer, &PaymentResolution::ClubFund).unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentResolutionInvalid);
        assert!(plan_resolution(&row, &payer, &PaymentResolution::Unpaid).is_ok());
    }
}
