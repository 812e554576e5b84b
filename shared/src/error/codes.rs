//! Unified error codes for the club service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 3xxx: Member / guest errors
//! - 4xxx: Game errors
//! - 5xxx: Payment and fund errors
//! - 6xxx: Report and badge errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so the frontend can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Admin session missing
    NotAuthenticated = 1001,
    /// Wrong admin password
    InvalidCredentials = 1002,
    /// Session token has expired
    TokenExpired = 1003,
    /// Session token is invalid
    TokenInvalid = 1004,
    /// Cron secret missing or wrong
    CronSecretInvalid = 1005,
    /// Too many login attempts
    TooManyAttempts = 1006,

    // ==================== 3xxx: Member / Guest ====================
    /// Member not found
    MemberNotFound = 3001,
    /// Member is inactive
    MemberInactive = 3002,
    /// Guest not found
    GuestNotFound = 3101,
    /// Guest has been promoted and is locked
    GuestPromoted = 3102,
    /// Guest was already promoted
    GuestAlreadyPromoted = 3103,
    /// Guest is inactive
    GuestInactive = 3104,

    // ==================== 4xxx: Game ====================
    /// Game not found
    GameNotFound = 4001,
    /// Game has no cost (no expenses, no legacy amounts)
    GameCostRequired = 4002,
    /// Expense line is invalid
    ExpenseInvalid = 4003,
    /// Member already registered for the game
    AttendanceExists = 4004,

    // ==================== 5xxx: Payment / Fund ====================
    /// Payment not found
    PaymentNotFound = 5001,
    /// Club fund cannot cover the requested cost
    InsufficientFunds = 5002,
    /// Resolution not allowed for this payer
    PaymentResolutionInvalid = 5003,
    /// Deposit not found
    DepositNotFound = 5101,
    /// Deposit amount must be positive
    DepositAmountInvalid = 5102,

    // ==================== 6xxx: Report / Badge ====================
    /// Settlement period not found
    PeriodNotFound = 6001,
    /// Date range is inverted or incomplete
    DateRangeInvalid = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",

            ErrorCode::NotAuthenticated => "Admin login required",
            ErrorCode::InvalidCredentials => "Invalid password",
            ErrorCode::TokenExpired => "Session has expired",
            ErrorCode::TokenInvalid => "Invalid session",
            ErrorCode::CronSecretInvalid => "Unauthorized",
            ErrorCode::TooManyAttempts => "Too many attempts, please retry later",

            ErrorCode::MemberNotFound => "Member not found",
            ErrorCode::MemberInactive => "Member is inactive",
            ErrorCode::GuestNotFound => "Guest not found",
            ErrorCode::GuestPromoted => "Cannot edit guest that has been promoted to member",
            ErrorCode::GuestAlreadyPromoted => "Guest has already been promoted to member",
            ErrorCode::GuestInactive => "Guest is inactive",

            ErrorCode::GameNotFound => "Game not found",
            ErrorCode::GameCostRequired => "At least one expense is required",
            ErrorCode::ExpenseInvalid => "Invalid expense",
            ErrorCode::AttendanceExists => "Member is already registered for this game",

            ErrorCode::PaymentNotFound => "Payment not found",
            ErrorCode::InsufficientFunds => "Club fund is insufficient",
            ErrorCode::PaymentResolutionInvalid => "Payment resolution not allowed",
            ErrorCode::DepositNotFound => "Deposit not found",
            ErrorCode::DepositAmountInvalid => "Amount must be greater than 0",

            ErrorCode::PeriodNotFound => "Period not found",
            ErrorCode::DateRangeInvalid => "from_date must be <= to_date",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ErrorCode::ValidationFailed),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::CronSecretInvalid),
            1006 => Ok(ErrorCode::TooManyAttempts),

            3001 => Ok(ErrorCode::MemberNotFound),
            3002 => Ok(ErrorCode::MemberInactive),
            3101 => Ok(ErrorCode::GuestNotFound),
            3102 => Ok(ErrorCode::GuestPromoted),
            3103 => Ok(ErrorCode::GuestAlreadyPromoted),
            3104 => Ok(ErrorCode::GuestInactive),

            4001 => Ok(ErrorCode::GameNotFound),
            4002 => Ok(ErrorCode::GameCostRequired),
            4003 => Ok(ErrorCode::ExpenseInvalid),
            4004 => Ok(ErrorCode::AttendanceExists),

            5001 => Ok(ErrorCode::PaymentNotFound),
            5002 => Ok(ErrorCode::InsufficientFunds),
            5003 => Ok(ErrorCode::PaymentResolutionInvalid),
            5101 => Ok(ErrorCode::DepositNotFound),
            5102 => Ok(ErrorCode::DepositAmountInvalid),

            6001 => Ok(ErrorCode::PeriodNotFound),
            6002 => Ok(ErrorCode::DateRangeInvalid),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[ErrorCode] = &[
        ErrorCode::ValidationFailed,
        ErrorCode::InvalidRequest,
        ErrorCode::InvalidFormat,
        ErrorCode::RequiredField,
        ErrorCode::ValueOutOfRange,
        ErrorCode::NotAuthenticated,
        ErrorCode::InvalidCredentials,
        ErrorCode::TokenExpired,
        ErrorCode::TokenInvalid,
        ErrorCode::CronSecretInvalid,
        ErrorCode::TooManyAttempts,
        ErrorCode::MemberNotFound,
        ErrorCode::MemberInactive,
        ErrorCode::GuestNotFound,
        ErrorCode::GuestPromoted,
        ErrorCode::GuestAlreadyPromoted,
        ErrorCode::GuestInactive,
        ErrorCode::GameNotFound,
        ErrorCode::GameCostRequired,
        ErrorCode::ExpenseInvalid,
        ErrorCode::AttendanceExists,
        ErrorCode::PaymentNotFound,
        ErrorCode::InsufficientFunds,
        ErrorCode::PaymentResolutionInvalid,
        ErrorCode::DepositNotFound,
        ErrorCode::DepositAmountInvalid,
        ErrorCode::PeriodNotFound,
        ErrorCode::DateRangeInvalid,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
    ];

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::RequiredField.code(), 7);
        assert_eq!(ErrorCode::GuestPromoted.code(), 3102);
        assert_eq!(ErrorCode::InsufficientFunds.code(), 5002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_roundtrip_all_codes() {
        for code in ALL {
            let value: u16 = (*code).into();
            assert_eq!(ErrorCode::try_from(value), Ok(*code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(9999), Err(InvalidErrorCode(9999)));
        assert_eq!(
            InvalidErrorCode(42).to_string(),
            "invalid error code: 42"
        );
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::AttendanceExists).unwrap();
        assert_eq!(json, "4004");
        let code: ErrorCode = serde_json::from_str("5002").unwrap();
        assert_eq!(code, ErrorCode::InsufficientFunds);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }
}
