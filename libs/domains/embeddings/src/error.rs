use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding not found: {0}")]
    NotFound(i64),

    #[error("No embedding above the similarity threshold")]
    NoMatch,

    #[error("Embedding store unavailable: {0}")]
    Unavailable(String),

    #[error("{operation} timed out after {budget:?}")]
    Timeout {
        operation: &'static str,
        budget: Duration,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

impl EmbeddingError {
    /// True for outcomes that mean "nothing there" rather than "something broke".
    pub fn is_not_found(&self) -> bool {
        matches!(self, EmbeddingError::NotFound(_) | EmbeddingError::NoMatch)
    }
}

/// Row/value conversion problems are bugs; everything else means the store
/// could not serve the request.
impl From<DbErr> for EmbeddingError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Type(_) | DbErr::Json(_) | DbErr::TryIntoErr { .. } => {
                EmbeddingError::Internal(err.to_string())
            }
            other => EmbeddingError::Unavailable(other.to_string()),
        }
    }
}

impl From<EmbeddingError> for AppError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::InvalidInput(msg) => AppError::BadRequest(msg),
            EmbeddingError::NotFound(id) => AppError::NotFound(format!("Embedding {} not found", id)),
            EmbeddingError::NoMatch => {
                AppError::NoMatch("No stored embedding is similar enough".to_string())
            }
            EmbeddingError::Unavailable(msg) => AppError::DatabaseUnavailable(msg),
            err @ EmbeddingError::Timeout { .. } => AppError::Timeout(err.to_string()),
            EmbeddingError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for EmbeddingError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status(err: EmbeddingError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status(EmbeddingError::InvalidInput("short".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(EmbeddingError::NotFound(4)), StatusCode::NOT_FOUND);
        assert_eq!(status(EmbeddingError::NoMatch), StatusCode::NOT_FOUND);
        assert_eq!(
            status(EmbeddingError::Unavailable("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(EmbeddingError::Timeout {
                operation: "validate",
                budget: Duration::from_secs(5)
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status(EmbeddingError::Internal("bad row".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_db_err_mapping() {
        let err: EmbeddingError = DbErr::Custom("connection reset".into()).into();
        assert!(matches!(err, EmbeddingError::Unavailable(_)));

        let err: EmbeddingError = DbErr::Type("expected vector".into()).into();
        assert!(matches!(err, EmbeddingError::Internal(_)));
    }

    #[test]
    fn test_not_found_outcomes() {
        assert!(EmbeddingError::NoMatch.is_not_found());
        assert!(EmbeddingError::NotFound(1).is_not_found());
        assert!(!EmbeddingError::Unavailable("x".into()).is_not_found());
    }
}
