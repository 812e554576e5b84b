//! Settlement period endpoints

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{delete, get, post},
};
use http::StatusCode;
use shared::error::AppError;
use shared::models::{SettlementPeriod, SettlementPeriodCreate};

use crate::auth::admin_auth_middleware;
use crate::services::settlement;
use crate::state::AppState;

use super::ApiResult;
use super::extract::{Json, Path};

pub fn router(state: &AppState) -> Router<AppState> {
    let read_routes = Router::new()
        .route("/api/settlement-periods", get(list))
        .route("/api/settlement-periods/latest", get(latest));

    let manage_routes = Router::new()
        .route("/api/settlement-periods", post(create))
        .route("/api/settlement-periods/{id}", delete(remove))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    read_routes.merge(manage_routes)
}

/// GET /api/settlement-periods
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<SettlementPeriod>> {
    Ok(Json(settlement::list_periods(&state.pool).await?))
}

/// GET /api/settlement-periods/latest (`null` when none exist)
pub async fn latest(State(state): State<AppState>) -> ApiResult<Option<SettlementPeriod>> {
    Ok(Json(settlement::latest_period(&state.pool).await?))
}

/// POST /api/settlement-periods
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<SettlementPeriodCreate>,
) -> Result<(StatusCode, Json<SettlementPeriod>), AppError> {
    let period = settlement::create_period(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(period)))
}

/// DELETE /api/settlement-periods/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    settlement::delete_period(&state.pool, id).await?;
    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}
