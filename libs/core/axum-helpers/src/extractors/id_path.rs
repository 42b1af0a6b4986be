//! Positive integer id path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Extracts a single `{id}` path segment as a positive `i64`.
///
/// Anything else (non-numeric, zero, negative, overflow) is rejected with a
/// 400 `INVALID_PATH` response.
///
/// ```ignore
/// async fn get_embedding(IdPath(id): IdPath) -> String {
///     format!("embedding {id}")
/// }
///
/// let app = Router::new().route("/embedding/{id}", get(get_embedding));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidPath(e.body_text()))?;

        match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(IdPath(id)),
            _ => Err(AppError::InvalidPath(format!("Invalid id: {raw}"))),
        }
    }
}
