//! Error classification shared by every TripDesk layer
//!
//! Module-specific errors stay in their own crates; this module only provides
//! the vocabulary used to classify them for logging and batch-job reporting.
//!
//! ```rust
//! use tripdesk_common::{ErrorClassification, ErrorSeverity};
//!
//! #[derive(Debug)]
//! enum JobError {
//!     Busy,
//!     Corrupt,
//! }
//!
//! impl ErrorClassification for JobError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, Self::Busy)
//!     }
//!
//!     fn severity(&self) -> ErrorSeverity {
//!         match self {
//!             Self::Busy => ErrorSeverity::Warning,
//!             Self::Corrupt => ErrorSeverity::Critical,
//!         }
//!     }
//! }
//!
//! assert!(JobError::Busy.is_retryable());
//! assert!(JobError::Corrupt.is_critical());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unified severity level for monitoring and log routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational; expected in normal operation.
    Info,
    /// Degraded but recoverable.
    Warning,
    /// The operation failed.
    Error,
    /// Requires operator attention.
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Standard interface for classifying errors by their characteristics.
pub trait ErrorClassification {
    /// Whether repeating the same operation may succeed.
    fn is_retryable(&self) -> bool;

    /// Severity used when logging the error.
    fn severity(&self) -> ErrorSeverity;

    /// Critical errors are logged at `error` level rather than `warn`.
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}
