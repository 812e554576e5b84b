//! Data models
//!
//! Shared between club-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (snowflake, see [`crate::util::snowflake_id`]).
//! Civil dates are `chrono::NaiveDate` in club time.

pub mod amount;
pub mod badge;
pub mod deposit;
pub mod game;
pub mod guest;
pub mod member;
pub mod payment;
pub mod settlement;
pub mod stats;

// Re-exports
pub use amount::*;
pub use badge::*;
pub use deposit::*;
pub use game::*;
pub use guest::*;
pub use member::*;
pub use payment::*;
pub use settlement::*;
pub use stats::*;
