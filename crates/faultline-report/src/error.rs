//! Construction-time error types
//!
//! Only client construction can fail. Every operation on a constructed
//! reporter degrades to a silent no-op on invalid or empty input instead of
//! raising; a failure to report a failure must never crash the caller.

use faultline_core::config::ConfigError;
use thiserror::Error;

/// Errors surfaced while constructing a [`Reporter`](crate::Reporter).
#[derive(Debug, Error)]
pub enum ReportError {
    /// The supplied configuration was invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// The transport rejected the configuration, e.g. a malformed endpoint.
    #[error("client construction failed: {0}")]
    Construction(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::Construction("relative URL without a base".to_string());
        assert_eq!(
            err.to_string(),
            "client construction failed: relative URL without a base"
        );

        let err: ReportError = ConfigError::EmptyEndpoint.into();
        assert_eq!(
            err.to_string(),
            "invalid configuration: endpoint must be provided"
        );
    }
}
