//! Shared types for the club service
//!
//! Error system, domain models and id/time utilities used by
//! `club-server` and by anything that talks to its API.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
