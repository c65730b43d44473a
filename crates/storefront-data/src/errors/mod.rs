//! Error types for storefront source operations.
//!
//! This module provides:
//! - [`SourceError`]: The main error enum for all upstream source operations
//! - [`SchemaError`]: Structured validation failure naming the offending field
//! - [`FailureKind`]: Classification for determining aggregation behavior

use thiserror::Error;

/// Errors that can occur while talking to an upstream commerce platform.
///
/// Each variant is classified into a [`FailureKind`] via the
/// [`failure_kind`](Self::failure_kind) method, which determines how the
/// aggregation layer should handle the error. No variant escapes the
/// aggregator boundary; at worst a source contributes zero items.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Required credentials or config were absent at construction time.
    /// The source stays dark for the process lifetime.
    #[error("Source not configured: {source_id}")]
    MissingConfig {
        /// The source that was left unconfigured
        source_id: String,
    },

    /// Network-level failure reaching the upstream.
    #[error("Transport error: {source_id} - {message}")]
    Transport {
        /// The source whose request failed
        source_id: String,
        /// The underlying transport error message
        message: String,
    },

    /// The upstream did not answer within the request timeout.
    /// Treated identically to a transient transport failure.
    #[error("Timeout: {source_id}")]
    Timeout {
        /// The source that timed out
        source_id: String,
    },

    /// The upstream rate limited the request (HTTP 429).
    #[error("Rate limited: {source_id}")]
    RateLimited {
        /// The source that rate limited the request
        source_id: String,
    },

    /// The upstream answered with a non-2xx HTTP status.
    #[error("HTTP {status} from {source_id}")]
    Status {
        /// The source that returned the status
        source_id: String,
        /// The HTTP status code
        status: u16,
    },

    /// The list/page envelope itself failed to decode.
    /// Fails the whole call for that source.
    #[error("Envelope error: {source_id} - {message}")]
    Envelope {
        /// The source whose envelope was malformed
        source_id: String,
        /// What failed to decode
        message: String,
    },

    /// A single item failed validation. The item is skipped at the call
    /// site; the rest of the batch still returns.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A network error occurred while communicating with the upstream.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Structured validation failure for a single upstream record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A required field was absent or empty. An absent identifier
    /// invalidates the record rather than defaulting it.
    #[error("Missing required field '{field}'")]
    MissingField {
        /// Name of the absent field
        field: &'static str,
    },

    /// A field was present but had the wrong shape.
    #[error("Field '{field}' has the wrong shape: {message}")]
    InvalidField {
        /// Name of the malformed field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },
}

/// How the aggregation layer should treat a [`SourceError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Permanent no-op: zero items for the process lifetime, no retry.
    Unconfigured,
    /// This call yields zero items; the next independent aggregation
    /// pass retries naturally. No in-process backoff.
    CallFailed,
    /// Only the offending item is dropped; the batch survives.
    ItemSkipped,
}

impl SourceError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use storefront_data::errors::{FailureKind, SourceError};
    ///
    /// let error = SourceError::Timeout { source_id: "GUMROAD".to_string() };
    /// assert_eq!(error.failure_kind(), FailureKind::CallFailed);
    /// ```
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::MissingConfig { .. } => FailureKind::Unconfigured,

            // Item-level validation never fails a batch
            Self::Schema(_) => FailureKind::ItemSkipped,

            // Everything else fails the single call only
            Self::Transport { .. }
            | Self::Timeout { .. }
            | Self::RateLimited { .. }
            | Self::Status { .. }
            | Self::Envelope { .. }
            | Self::Network(_) => FailureKind::CallFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_unconfigured() {
        let error = SourceError::MissingConfig {
            source_id: "PATREON".to_string(),
        };
        assert_eq!(error.failure_kind(), FailureKind::Unconfigured);
    }

    #[test]
    fn test_transport_fails_single_call() {
        let error = SourceError::Transport {
            source_id: "GUMROAD".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(error.failure_kind(), FailureKind::CallFailed);
    }

    #[test]
    fn test_timeout_fails_single_call() {
        let error = SourceError::Timeout {
            source_id: "FOURTHWALL".to_string(),
        };
        assert_eq!(error.failure_kind(), FailureKind::CallFailed);
    }

    #[test]
    fn test_envelope_fails_single_call() {
        let error = SourceError::Envelope {
            source_id: "LEMONSQUEEZY".to_string(),
            message: "missing 'data' array".to_string(),
        };
        assert_eq!(error.failure_kind(), FailureKind::CallFailed);
    }

    #[test]
    fn test_schema_error_skips_item_only() {
        let error = SourceError::Schema(SchemaError::MissingField { field: "id" });
        assert_eq!(error.failure_kind(), FailureKind::ItemSkipped);
    }

    #[test]
    fn test_error_display() {
        let error = SourceError::Status {
            source_id: "GUMROAD".to_string(),
            status: 503,
        };
        assert_eq!(format!("{}", error), "HTTP 503 from GUMROAD");

        let error = SourceError::Schema(SchemaError::MissingField { field: "id" });
        assert_eq!(format!("{}", error), "Missing required field 'id'");
    }
}
