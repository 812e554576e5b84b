//! Payment endpoints

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{get, put},
};
use shared::models::{PaymentEntry, PaymentResolution, PaymentResolved};

use crate::auth::admin_auth_middleware;
use crate::services::payments;
use crate::state::AppState;

use super::ApiResult;
use super::extract::{Json, Path};

pub fn router(state: &AppState) -> Router<AppState> {
    let read_routes = Router::new().route("/api/payments", get(list));

    let manage_routes = Router::new()
        .route("/api/payments/{id}", put(resolve))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    read_routes.merge(manage_routes)
}

/// GET /api/payments
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<PaymentEntry>> {
    Ok(Json(payments::list_payments(&state.pool).await?))
}

/// PUT /api/payments/{id}
pub async fn resolve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(resolution): Json<PaymentResolution>,
) -> ApiResult<PaymentResolved> {
    Ok(Json(
        payments::resolve_payment(&state.pool, id, &resolution).await?,
    ))
}
