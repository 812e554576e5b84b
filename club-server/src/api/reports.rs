//! Read-only dashboards: stats, streak, settlement report, leaderboard

use axum::{
    Router,
    extract::State,
    routing::get,
};
use shared::models::{ClubStats, MonthlyLeaderboard, SettlementQuery, SettlementReport, StreakSummary};

use crate::services::{badges, ledger, settlement, streak};
use crate::state::AppState;

use super::ApiResult;
use super::extract::{Json, Query};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stats", get(stats))
        .route("/api/streak", get(weekly_streak))
        .route("/api/reports/settlement", get(settlement_report))
        .route("/api/leaderboard/monthly", get(monthly_leaderboard))
}

/// GET /api/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<ClubStats> {
    Ok(Json(ledger::club_stats(&state.pool, state.low_fund_threshold).await?))
}

/// GET /api/streak
pub async fn weekly_streak(State(state): State<AppState>) -> ApiResult<StreakSummary> {
    Ok(Json(streak::streak(&state.pool, state.tz).await?))
}

/// GET /api/reports/settlement?period_id= | ?from_date=&to_date=
pub async fn settlement_report(
    State(state): State<AppState>,
    Query(query): Query<SettlementQuery>,
) -> ApiResult<SettlementReport> {
    Ok(Json(
        settlement::settlement_report(&state.pool, state.tz, &query).await?,
    ))
}

/// GET /api/leaderboard/monthly
pub async fn monthly_leaderboard(State(state): State<AppState>) -> ApiResult<MonthlyLeaderboard> {
    Ok(Json(badges::monthly_leaderboard(&state.pool, state.tz).await?))
}
