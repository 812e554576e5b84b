//! HTTP API for club-server
//!
//! Reads are public. Writes that change the ledger sit behind the admin
//! session middleware; the cron route checks its own shared secret.

pub mod admin;
pub mod cron;
pub mod deposits;
pub mod extract;
pub mod games;
pub mod guests;
pub mod health;
pub mod members;
pub mod payments;
pub mod periods;
pub mod reports;

use axum::Router;
use http::{HeaderName, HeaderValue};
use shared::error::AppError;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::state::AppState;

use self::extract::Json;

pub type ApiResult<T> = Result<Json<T>, AppError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes with state, no middleware
pub fn build_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(reports::router())
        .merge(members::router(state))
        .merge(guests::router(state))
        .merge(deposits::router(state))
        .merge(games::router(state))
        .merge(payments::router(state))
        .merge(periods::router(state))
        .merge(cron::router())
        .merge(admin::router(state))
}

/// Fully layered application, used by `main` and by the router tests
pub fn build_app(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    build_router(&state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
        .with_state(state)
}
