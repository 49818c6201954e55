//! Error types for awspricing
//!
//! There are two error types: `PricingError` (main error enum) and
//! `ConfigError` (configuration-specific).
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `PricingError`.
//! The binary uses `anyhow::Result<T>` and converts at the CLI boundary so the
//! error chain survives into the printed message.
//!
//! Only two things are fatal for a pricing query:
//! - the feed could not be retrieved (`Fetch`)
//! - the feed could not be parsed or lacks `config.regions` (`MalformedFeed`)
//!
//! Everything below that level degrades to partial data:
//! - an entry without a name produces `MissingField`, which the caller logs
//!   and skips
//! - a non-numeric field value leaves the field unset
//! - a missing specification table yields an empty table
//!
//! ## When to Use Which Error
//!
//! - `ConfigError`: configuration parsing and validation issues
//!   - Automatically converted to `PricingError::Config` via `#[from]`
//! - `Fetch`: transport failures and non-success HTTP statuses
//! - `MalformedFeed`: envelope, JSON or top-level shape problems
//! - `MissingField`: a raw entry lacks its mandatory name

use thiserror::Error;

/// Main error type for awspricing
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch pricing feed {url}: {message}")]
    Fetch {
        url: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Malformed pricing feed: {reason}")]
    MalformedFeed { reason: String },

    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PricingError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        PricingError::MalformedFeed {
            reason: reason.into(),
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PricingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: PricingError = ConfigError::MissingField("default_region".to_string()).into();
        assert!(matches!(err, PricingError::Config(_)));
        assert!(err.to_string().contains("default_region"));
    }

    #[test]
    fn test_fetch_error_display() {
        let err = PricingError::Fetch {
            url: "http://example.com/feed.js".to_string(),
            message: "HTTP 503".to_string(),
            source: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("http://example.com/feed.js"));
        assert!(msg.contains("HTTP 503"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PricingError = parse_err.into();
        assert!(matches!(err, PricingError::Json(_)));
        assert!(err.to_string().starts_with("JSON serialization error"));
    }

    #[test]
    fn test_missing_field_display() {
        let err = PricingError::MissingField {
            field: "size".to_string(),
            context: "compute entry".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required field 'size' in compute entry"
        );
    }
}
