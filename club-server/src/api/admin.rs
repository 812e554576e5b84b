//! Admin login, status and logout

use axum::{
    Router,
    extract::State,
    middleware,
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
};
use http::HeaderMap;
use http::header::SET_COOKIE;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::auth::admin::{
    create_token, is_admin, password_matches, session_clear_cookie, session_set_cookie,
};
use crate::auth::rate_limit::login_rate_limit;
use crate::state::AppState;

use super::ApiResult;
use super::extract::Json;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub is_admin: bool,
}

pub fn router(state: &AppState) -> Router<AppState> {
    let login_route = Router::new()
        .route("/api/admin/login", post(login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    Router::new()
        .route("/api/admin/login", get(status))
        .route("/api/admin/logout", post(logout))
        .merge(login_route)
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !password_matches(&req.password, &state.admin_password) {
        tracing::warn!("Admin login with wrong password");
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }

    let token = create_token(&state.jwt_secret).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;
    tracing::info!("Admin logged in");

    Ok((
        AppendHeaders([(SET_COOKIE, session_set_cookie(&token, state.secure_cookies))]),
        Json(AdminStatus { is_admin: true }),
    ))
}

/// GET /api/admin/login
pub async fn status(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<AdminStatus> {
    Ok(Json(AdminStatus {
        is_admin: is_admin(&headers, &state.jwt_secret),
    }))
}

/// POST /api/admin/logout
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, session_clear_cookie(state.secure_cookies))]),
        Json(AdminStatus { is_admin: false }),
    )
}
