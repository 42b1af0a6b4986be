use core_config::{env_parse_or_default, ConfigError, FromEnv};
use std::time::Duration;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.58;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for matching and for bounding store calls.
///
/// - `SIMILARITY_THRESHOLD` (default `0.58`, within `[0, 1]`): a stored
///   embedding matches only when `1 - cosine_distance` is strictly greater
/// - `REQUEST_TIMEOUT_SECS` (default `5`, at least `1`): budget for each
///   repository call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingSettings {
    pub similarity_threshold: f64,
    pub request_timeout: Duration,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl FromEnv for EmbeddingSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let similarity_threshold: f64 = env_parse_or_default(
            "SIMILARITY_THRESHOLD",
            &DEFAULT_SIMILARITY_THRESHOLD.to_string(),
        )?;
        if !(0.0..=1.0).contains(&similarity_threshold) {
            return Err(ConfigError::ParseError {
                key: "SIMILARITY_THRESHOLD".to_string(),
                details: format!("{similarity_threshold} is outside [0, 1]"),
            });
        }

        let timeout_secs: u64 = env_parse_or_default(
            "REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT.as_secs().to_string(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::ParseError {
                key: "REQUEST_TIMEOUT_SECS".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            similarity_threshold,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
