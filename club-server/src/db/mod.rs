//! Database access layer
//!
//! Free functions over `&PgPool` (or an open transaction) returning
//! `sqlx::Error`; business rules live in `crate::services`.

pub mod badges;
pub mod deposits;
pub mod games;
pub mod guests;
pub mod ledger;
pub mod members;
pub mod payments;
pub mod periods;

pub(crate) use shared::util::snowflake_id;
