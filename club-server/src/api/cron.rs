//! Scheduled jobs triggered from outside

use axum::{
    Router,
    extract::State,
    routing::get,
};
use http::HeaderMap;
use serde::Deserialize;
use shared::models::BadgeJobOutcome;

use crate::auth::cron::check_cron_secret;
use crate::services::badges;
use crate::state::AppState;

use super::ApiResult;
use super::extract::{Json, Query};

#[derive(Debug, Default, Deserialize)]
pub struct CronQuery {
    pub secret: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/cron/calculate-badges", get(calculate_badges))
}

/// GET /api/cron/calculate-badges
pub async fn calculate_badges(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CronQuery>,
) -> ApiResult<BadgeJobOutcome> {
    check_cron_secret(state.cron_secret.as_deref(), &headers, query.secret.as_deref())?;
    Ok(Json(badges::run_badge_job(&state.pool, state.tz).await?))
}
