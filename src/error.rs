//! Error types for the dashboard client
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Decoders never swallow failures: a single bad element aborts the whole
//! report call, since downstream consumers assume complete sequences.

use thiserror::Error;

/// The main error type for the dashboard client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Decoding Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Malformed timestamp: {raw}")]
    MalformedTimestamp { raw: String },

    #[error("Unexpected response shape: missing '{path}'")]
    UnexpectedResponseShape { path: String },

    #[error("Unknown manufacturer index: {index}")]
    UnknownManufacturer { index: i64 },

    #[error("Unknown row discriminator: {discriminator}")]
    UnknownRowDiscriminator { discriminator: i64 },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed timestamp error
    pub fn malformed_timestamp(raw: impl Into<String>) -> Self {
        Self::MalformedTimestamp { raw: raw.into() }
    }

    /// Create an unexpected response shape error for a navigation path
    pub fn shape(path: impl Into<String>) -> Self {
        Self::UnexpectedResponseShape { path: path.into() }
    }

    /// Create an unknown manufacturer error
    pub fn unknown_manufacturer(index: i64) -> Self {
        Self::UnknownManufacturer { index }
    }

    /// Create an unknown row discriminator error
    pub fn unknown_discriminator(discriminator: i64) -> Self {
        Self::UnknownRowDiscriminator { discriminator }
    }

    /// Check if this error indicates an upstream schema change rather than
    /// a transient transport problem
    pub fn is_schema_drift(&self) -> bool {
        matches!(
            self,
            Error::UnexpectedResponseShape { .. }
                | Error::UnknownManufacturer { .. }
                | Error::UnknownRowDiscriminator { .. }
        )
    }
}

/// Result type alias for the dashboard client
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::http_status(503, "upstream down");
        assert_eq!(err.to_string(), "HTTP 503: upstream down");

        let err = Error::malformed_timestamp("not-a-number");
        assert_eq!(err.to_string(), "Malformed timestamp: not-a-number");

        let err = Error::shape("results[0].result.data.dsr");
        assert_eq!(
            err.to_string(),
            "Unexpected response shape: missing 'results[0].result.data.dsr'"
        );

        let err = Error::unknown_manufacturer(7);
        assert_eq!(err.to_string(), "Unknown manufacturer index: 7");

        let err = Error::unknown_discriminator(4);
        assert_eq!(err.to_string(), "Unknown row discriminator: 4");
    }

    #[test]
    fn test_is_schema_drift() {
        assert!(Error::shape("results").is_schema_drift());
        assert!(Error::unknown_manufacturer(3).is_schema_drift());
        assert!(Error::unknown_discriminator(9).is_schema_drift());

        assert!(!Error::http_status(500, "").is_schema_drift());
        assert!(!Error::malformed_timestamp("x").is_schema_drift());
    }
}
