//! Exit code standardization for awspricing
//!
//! Provides consistent exit codes for different error types so scripts can
//! tell a bad invocation apart from an unreachable feed.
//!
//! ## Exit Code Convention
//!
//! - `0` = Success
//! - `1` = User error (invalid input, missing mandatory field)
//! - `2` = System error (feed unreachable, malformed feed, I/O)
//! - `3` = Configuration error (invalid or unparsable config)

use crate::error::PricingError;

/// Standard exit codes for awspricing
pub mod codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// User error (invalid input, validation failure)
    pub const USER_ERROR: i32 = 1;
    /// System error (network error, malformed feed)
    pub const SYSTEM_ERROR: i32 = 2;
    /// Configuration error (invalid or unparsable config)
    pub const CONFIG_ERROR: i32 = 3;
}

/// Map a PricingError to an appropriate exit code
pub fn exit_code_for_error(error: &PricingError) -> i32 {
    use PricingError::*;
    match error {
        Config(_) => codes::CONFIG_ERROR,

        MissingField { .. } => codes::USER_ERROR,

        Fetch { .. } => codes::SYSTEM_ERROR,
        MalformedFeed { .. } => codes::SYSTEM_ERROR,
        Io(_) => codes::SYSTEM_ERROR,
        Json(_) => codes::SYSTEM_ERROR,
    }
}

/// Find the exit code for an `anyhow` error raised at the CLI boundary.
///
/// Walks the chain looking for a `PricingError`; anything else is a system error.
pub fn exit_code_for_anyhow(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<PricingError>())
        .map(exit_code_for_error)
        .unwrap_or(codes::SYSTEM_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_config_errors_map_to_config_code() {
        let err = PricingError::Config(ConfigError::ParseError("bad".to_string()));
        assert_eq!(exit_code_for_error(&err), codes::CONFIG_ERROR);
    }

    #[test]
    fn test_feed_errors_map_to_system_code() {
        let err = PricingError::malformed("no regions");
        assert_eq!(exit_code_for_error(&err), codes::SYSTEM_ERROR);
    }

    #[test]
    fn test_anyhow_chain_is_searched() {
        let err = anyhow::Error::from(PricingError::Config(ConfigError::MissingField(
            "feeds.ec2".to_string(),
        )))
        .context("Failed to load configuration");
        assert_eq!(exit_code_for_anyhow(&err), codes::CONFIG_ERROR);

        let plain = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for_anyhow(&plain), codes::SYSTEM_ERROR);
    }
}
