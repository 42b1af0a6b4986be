//! Error codes carried by every error response.
//!
//! Each code has a string identifier for clients (`"VALIDATION_ERROR"`), an
//! integer for logs and dashboards (`1001`) and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    /// Request body decoded but failed field validation
    ValidationError,

    /// Path parameter could not be parsed
    InvalidPath,

    /// Request body is not valid JSON for the endpoint
    InvalidJson,

    NotFound,

    /// The lookup ran but nothing satisfied its criteria
    NoMatch,

    // Server errors
    InternalError,

    /// An operation exceeded its time budget
    Timeout,

    // Database errors (2000s)
    /// The database could not be reached or rejected the query
    DatabaseUnavailable,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidPath => "INVALID_PATH",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
            Self::NoMatch => "NO_MATCH",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
        }
    }

    pub const fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidPath => 1002,
            Self::InvalidJson => 1003,
            Self::NotFound => 1004,
            Self::NoMatch => 1005,
            Self::InternalError => 1006,
            Self::Timeout => 1007,
            Self::DatabaseUnavailable => 2001,
        }
    }

    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidPath => "Invalid path parameter",
            Self::InvalidJson => "Invalid JSON body",
            Self::NotFound => "Resource not found",
            Self::NoMatch => "No matching resource found",
            Self::InternalError => "An internal server error occurred",
            Self::Timeout => "The operation timed out",
            Self::DatabaseUnavailable => "The database is unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ErrorCode; 8] = [
        ErrorCode::ValidationError,
        ErrorCode::InvalidPath,
        ErrorCode::InvalidJson,
        ErrorCode::NotFound,
        ErrorCode::NoMatch,
        ErrorCode::InternalError,
        ErrorCode::Timeout,
        ErrorCode::DatabaseUnavailable,
    ];

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<i32> = ALL.iter().map(ErrorCode::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), ALL.len());
    }

    #[test]
    fn test_serde_matches_as_str() {
        for code in ALL {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::NoMatch.to_string(), "NO_MATCH");
        assert_eq!(ErrorCode::DatabaseUnavailable.code(), 2001);
    }
}
