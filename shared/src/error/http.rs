//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::MemberNotFound
            | Self::GuestNotFound
            | Self::GameNotFound
            | Self::PaymentNotFound
            | Self::DepositNotFound
            | Self::PeriodNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AttendanceExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::CronSecretInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::GuestPromoted => StatusCode::FORBIDDEN,

            // 429 Too Many Requests
            Self::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation, business rules, insufficient funds)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
