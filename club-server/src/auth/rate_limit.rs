//! Fixed-window rate limiting for the admin login route

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

/// Login attempts allowed per window and client
pub const LOGIN_MAX_ATTEMPTS: u32 = 5;
pub const LOGIN_WINDOW: Duration = Duration::from_secs(60);

/// Entries idle for longer than this are dropped by [`RateLimiter::cleanup`]
const STALE_AFTER: Duration = Duration::from_secs(300);

struct Window {
    count: u32,
    started: Instant,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    /// client IP -> current window
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one attempt; `false` once the client is over the limit
    pub async fn check(&self, client: &str, max_attempts: u32, window: Duration) -> bool {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();

        let entry = windows.entry(client.to_owned()).or_insert(Window {
            count: 0,
            started: now,
        });
        if now.duration_since(entry.started) >= window {
            entry.count = 0;
            entry.started = now;
        }

        entry.count += 1;
        entry.count <= max_attempts
    }

    pub async fn cleanup(&self) {
        let now = Instant::now();
        self.windows
            .lock()
            .await
            .retain(|_, w| now.duration_since(w.started) < STALE_AFTER);
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.windows.lock().await.len()
    }
}

/// Client IP for rate limiting
///
/// The peer address is used unless the server sits behind a trusted proxy,
/// in which case the last `X-Forwarded-For` hop (the one that proxy appended)
/// wins. Earlier hops are client-controlled and never consulted.
fn client_ip(request: &Request, trust_proxy: bool) -> String {
    let forwarded = if trust_proxy {
        request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(str::to_owned)
    } else {
        None
    };

    forwarded
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_owned())
}

pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request, state.trust_proxy);
    if !state
        .rate_limiter
        .check(&ip, LOGIN_MAX_ATTEMPTS, LOGIN_WINDOW)
        .await
    {
        tracing::warn!(ip = %ip, "Admin login rate limit hit");
        return Err(AppError::with_message(
            ErrorCode::TooManyAttempts,
            "Too many login attempts, try again later",
        ));
    }
    Ok(next.run(request).await)
}
