//! Application state for club-server

use chrono_tz::Tz;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Admin login password
    pub admin_password: String,
    /// JWT secret for admin sessions
    pub jwt_secret: String,
    /// Cron endpoint secret (open when `None`)
    pub cron_secret: Option<String>,
    /// Club civil timezone
    pub tz: Tz,
    pub low_fund_threshold: f64,
    /// Secure flag on the admin cookie (off in development)
    pub secure_cookies: bool,
    /// Rate limiter for the admin login route
    pub rate_limiter: RateLimiter,
    /// Key the login limit on the proxy's `X-Forwarded-For` hop
    pub trust_proxy: bool,
}

impl AppState {
    /// Connect, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::with_pool(pool, config))
    }

    /// Build the state around an existing pool (no connection is made)
    pub fn with_pool(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            admin_password: config.admin_password.clone(),
            jwt_secret: config.jwt_secret.clone(),
            cron_secret: config.cron_secret.clone(),
            tz: config.timezone,
            low_fund_threshold: config.low_fund_threshold,
            secure_cookies: config.environment != "development",
            rate_limiter: RateLimiter::new(),
            trust_proxy: config.trust_proxy,
        }
    }
}
