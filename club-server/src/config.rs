//! Club server configuration

use chrono_tz::Tz;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Club server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Pool size
    pub database_max_connections: u32,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Password accepted by the admin login
    pub admin_password: String,
    /// HS256 secret for admin session tokens
    pub jwt_secret: String,
    /// Shared secret for the cron endpoint; `None` leaves it open
    pub cron_secret: Option<String>,
    /// Civil timezone for "today", month boundaries and week ids
    pub timezone: Tz,
    /// Club fund below this value is flagged as low
    pub low_fund_threshold: f64,
    /// Period of the in-process badge job, 0 disables it
    pub badge_job_interval_secs: u64,
    /// Behind a trusted reverse proxy: rate limiting keys on its `X-Forwarded-For` hop
    pub trust_proxy: bool,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let tz_name = std::env::var("CLUB_TIMEZONE").unwrap_or_else(|_| "Asia/Ho_Chi_Minh".into());
        let timezone: Tz = tz_name
            .parse()
            .map_err(|_| format!("CLUB_TIMEZONE '{tz_name}' is not a valid IANA timezone"))?;

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            database_max_connections: Self::parse_or("DATABASE_MAX_CONNECTIONS", 10),
            http_port: Self::parse_or("HTTP_PORT", 8080),
            environment: environment.clone(),
            admin_password: Self::require_secret("ADMIN_PASSWORD", &environment)?,
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            cron_secret: std::env::var("CRON_SECRET").ok().filter(|s| !s.is_empty()),
            timezone,
            low_fund_threshold: Self::parse_or("LOW_FUND_THRESHOLD", 100_000.0),
            badge_job_interval_secs: Self::parse_or("BADGE_JOB_INTERVAL_SECS", 3600),
            trust_proxy: Self::parse_or("TRUST_PROXY", false),
        })
    }

    /// Configuration for in-process tests (no environment lookup)
    pub fn for_tests(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            database_max_connections: 1,
            http_port: 0,
            environment: "development".into(),
            admin_password: "test-password".into(),
            jwt_secret: "test-jwt-secret".into(),
            cron_secret: Some("test-cron-secret".into()),
            timezone: chrono_tz::Asia::Ho_Chi_Minh,
            low_fund_threshold: 100_000.0,
            badge_job_interval_secs: 0,
            trust_proxy: false,
        }
    }
}
