//! Game endpoints: creation with payments, edits, attendance

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{get, patch, post},
};
use http::StatusCode;
use serde::Deserialize;
use shared::error::AppError;
use shared::models::{
    AttendanceCreate, AttendanceCreated, GameCreate, GameCreated, GameDetail, GameParticipant,
    GameUpdate,
};

use crate::auth::admin_auth_middleware;
use crate::services::games;
use crate::state::AppState;
use crate::time::parse_date;

use super::ApiResult;
use super::extract::{Json, Path, Query};

#[derive(Debug, Default, Deserialize)]
pub struct GameListQuery {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

pub fn router(state: &AppState) -> Router<AppState> {
    let read_routes = Router::new()
        .route("/api/games", get(list))
        .route("/api/games/{id}/members", get(attendance).post(check_in));

    let manage_routes = Router::new()
        .route("/api/games", post(create))
        .route("/api/games/{id}", patch(update).delete(remove))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    read_routes.merge(manage_routes)
}

/// GET /api/games
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<GameListQuery>,
) -> ApiResult<Vec<GameDetail>> {
    let from = query.from_date.as_deref().map(parse_date).transpose()?;
    let to = query.to_date.as_deref().map(parse_date).transpose()?;
    Ok(Json(games::list_games(&state.pool, from, to).await?))
}

/// POST /api/games
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<GameCreate>,
) -> Result<(StatusCode, Json<GameCreated>), AppError> {
    let created = games::create_game(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/games/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<GameUpdate>,
) -> ApiResult<GameDetail> {
    Ok(Json(games::update_game(&state.pool, id, &payload).await?))
}

/// DELETE /api/games/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    games::delete_game(&state.pool, id).await?;
    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}

/// GET /api/games/{id}/members
pub async fn attendance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<GameParticipant>> {
    Ok(Json(games::attendance(&state.pool, id).await?))
}

/// POST /api/games/{id}/members
pub async fn check_in(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AttendanceCreate>,
) -> Result<(StatusCode, Json<AttendanceCreated>), AppError> {
    let created = games::check_in(&state.pool, id, payload.member_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
