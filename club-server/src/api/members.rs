//! Member roster endpoints

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{get, post, put},
};
use http::StatusCode;
use serde::Deserialize;
use shared::error::AppError;
use shared::models::{
    BadgeMonth, BulkCreateResult, BulkNames, Member, MemberCreate, MemberGame, MemberStats,
    MemberUpdate, MemberWithBalance,
};

use crate::auth::admin_auth_middleware;
use crate::services::{badges, roster};
use crate::state::AppState;

use super::ApiResult;
use super::extract::{Json, Path, Query};

#[derive(Debug, Default, Deserialize)]
pub struct MemberListQuery {
    /// Only active members (default true)
    pub active: Option<bool>,
}

pub fn router(state: &AppState) -> Router<AppState> {
    let read_routes = Router::new()
        .route("/api/members", get(list))
        .route("/api/members/{id}/stats", get(stats))
        .route("/api/members/{id}/games", get(games))
        .route("/api/members/{id}/badges", get(badge_history));

    let manage_routes = Router::new()
        .route("/api/members", post(create))
        .route("/api/members/bulk", post(bulk_create))
        .route("/api/members/{id}", put(update).delete(deactivate))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    read_routes.merge(manage_routes)
}

/// GET /api/members
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MemberListQuery>,
) -> ApiResult<Vec<MemberWithBalance>> {
    let active_only = query.active.unwrap_or(true);
    Ok(Json(roster::list_members(&state.pool, active_only).await?))
}

/// POST /api/members
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<MemberCreate>,
) -> Result<(StatusCode, Json<Member>), AppError> {
    let member = roster::create_member(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// POST /api/members/bulk
pub async fn bulk_create(
    State(state): State<AppState>,
    Json(payload): Json<BulkNames>,
) -> ApiResult<BulkCreateResult<Member>> {
    Ok(Json(roster::bulk_create_members(&state.pool, &payload.names).await?))
}

/// PUT /api/members/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<MemberUpdate>,
) -> ApiResult<Member> {
    Ok(Json(roster::update_member(&state.pool, id, &payload).await?))
}

/// DELETE /api/members/{id}
pub async fn deactivate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    roster::deactivate_member(&state.pool, id).await?;
    Ok(Json(serde_json::json!({ "id": id, "is_active": false })))
}

/// GET /api/members/{id}/stats
pub async fn stats(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<MemberStats> {
    Ok(Json(roster::member_stats(&state.pool, id).await?))
}

/// GET /api/members/{id}/games
pub async fn games(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Vec<MemberGame>> {
    Ok(Json(roster::member_games(&state.pool, id).await?))
}

/// GET /api/members/{id}/badges
pub async fn badge_history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<BadgeMonth>> {
    Ok(Json(badges::member_history(&state.pool, state.tz, id).await?))
}
