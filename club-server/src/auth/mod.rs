//! Admin session, cron secret and login rate limiting

pub mod admin;
pub mod cron;
pub mod rate_limit;

pub use admin::admin_auth_middleware;
