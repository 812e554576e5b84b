//! Guest endpoints

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{get, post, put},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::{
    BulkCreateResult, BulkNames, Guest, GuestActiveUpdate, GuestCreate, GuestUpdate, Member,
};

use crate::auth::admin_auth_middleware;
use crate::services::roster;
use crate::state::AppState;

use super::ApiResult;
use super::extract::{Json, Path, Query};

#[derive(Debug, Default, Deserialize)]
pub struct GuestListQuery {
    /// Only guests that can be picked for a new game
    #[serde(default)]
    pub selectable: bool,
}

#[derive(Debug, Serialize)]
pub struct GuestPromoted {
    pub guest_id: i64,
    pub member: Member,
}

pub fn router(state: &AppState) -> Router<AppState> {
    let read_routes = Router::new().route("/api/guests", get(list));

    let manage_routes = Router::new()
        .route("/api/guests", post(create))
        .route("/api/guests/bulk", post(bulk_create))
        .route("/api/guests/{id}", put(rename).patch(set_active))
        .route("/api/guests/{id}/promote", post(promote))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    read_routes.merge(manage_routes)
}

/// GET /api/guests
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<GuestListQuery>,
) -> ApiResult<Vec<Guest>> {
    Ok(Json(roster::list_guests(&state.pool, query.selectable).await?))
}

/// POST /api/guests
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<GuestCreate>,
) -> Result<(StatusCode, Json<Guest>), AppError> {
    let guest = roster::create_guest(&state.pool, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(guest)))
}

/// POST /api/guests/bulk
pub async fn bulk_create(
    State(state): State<AppState>,
    Json(payload): Json<BulkNames>,
) -> ApiResult<BulkCreateResult<Guest>> {
    Ok(Json(roster::bulk_create_guests(&state.pool, &payload.names).await?))
}

/// PUT /api/guests/{id}
pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<GuestUpdate>,
) -> ApiResult<Guest> {
    Ok(Json(roster::rename_guest(&state.pool, id, &payload.name).await?))
}

/// PATCH /api/guests/{id}
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<GuestActiveUpdate>,
) -> ApiResult<Guest> {
    Ok(Json(
        roster::set_guest_active(&state.pool, id, payload.is_active).await?,
    ))
}

/// POST /api/guests/{id}/promote
pub async fn promote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<GuestPromoted>), AppError> {
    let member = roster::promote_guest(&state.pool, id).await?;
    Ok((StatusCode::CREATED, Json(GuestPromoted { guest_id: id, member })))
}
