//! Deposit endpoints

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{delete, get, post},
};
use http::StatusCode;
use shared::error::AppError;
use shared::models::{Deposit, DepositCreate, DepositQuery, DepositWithMember};

use crate::auth::admin_auth_middleware;
use crate::services::deposits;
use crate::state::AppState;

use super::ApiResult;
use super::extract::{Json, Path, Query};

pub fn router(state: &AppState) -> Router<AppState> {
    let read_routes = Router::new().route("/api/deposits", get(list));

    let manage_routes = Router::new()
        .route("/api/deposits", post(create))
        .route("/api/deposits/{id}", delete(remove))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    read_routes.merge(manage_routes)
}

/// GET /api/deposits?from_date=&to_date=&member_id=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<DepositQuery>,
) -> ApiResult<Vec<DepositWithMember>> {
    Ok(Json(deposits::list_deposits(&state.pool, &query).await?))
}

/// POST /api/deposits
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<DepositCreate>,
) -> Result<(StatusCode, Json<Deposit>), AppError> {
    let deposit = deposits::create_deposit(&state.pool, state.tz, &payload).await?;
    Ok((StatusCode::CREATED, Json(deposit)))
}

/// DELETE /api/deposits/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    deposits::delete_deposit(&state.pool, id).await?;
    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}
