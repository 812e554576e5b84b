//! club-server: ledger, games and rankings for a small sports club
//!
//! Members pay deposits into a shared club fund. Each game's cost is split
//! per participant; guests settle their share directly, from the fund, or
//! through members covering for them. Balances are always derived from the
//! ledger rows, never stored.

pub mod api;
pub mod auth;
pub mod avatar;
pub mod config;
pub mod db;
pub mod error;
pub mod money;
pub mod services;
pub mod state;
pub mod time;
pub mod validation;
