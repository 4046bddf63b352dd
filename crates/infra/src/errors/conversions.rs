//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use rusqlite::Error as SqlError;
use tokio::task::JoinError;
use tripdesk_common::storage::StorageError;
use tripdesk_common::{ErrorClassification, ErrorSeverity};
use tripdesk_domain::TripDeskError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TripDeskError);

impl From<InfraError> for TripDeskError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TripDeskError> for InfraError {
    fn from(value: TripDeskError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTripDeskError {
    fn into_tripdesk(self) -> TripDeskError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → TripDeskError */
/* -------------------------------------------------------------------------- */

impl IntoTripDeskError for SqlError {
    fn into_tripdesk(self) -> TripDeskError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        TripDeskError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        TripDeskError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        TripDeskError::Database(format!("unique constraint violation: {message}"))
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        TripDeskError::Database("foreign key constraint violation".into())
                    }
                    _ => TripDeskError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => TripDeskError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(column, _, cause) => TripDeskError::Database(format!(
                "failed to convert sqlite value in column {column}: {cause}"
            )),
            RE::InvalidColumnType(_, name, ty) => {
                TripDeskError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::Utf8Error(_) => {
                TripDeskError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidParameterName(parameter_name) => {
                TripDeskError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => TripDeskError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => TripDeskError::Database("invalid SQL query".into()),
            other => TripDeskError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_tripdesk())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → TripDeskError */
/* -------------------------------------------------------------------------- */

impl IntoTripDeskError for StorageError {
    fn into_tripdesk(self) -> TripDeskError {
        match self {
            StorageError::Rusqlite(err) => err.into_tripdesk(),
            StorageError::Io(err) => err.into_tripdesk(),
            StorageError::InvalidConfig(message) => TripDeskError::Config(message),
            other => TripDeskError::Database(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_tripdesk())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → TripDeskError */
/* -------------------------------------------------------------------------- */

impl IntoTripDeskError for IoError {
    fn into_tripdesk(self) -> TripDeskError {
        match self.kind() {
            ErrorKind::NotFound => TripDeskError::NotFound(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                TripDeskError::Storage(format!("permission denied: {self}"))
            }
            _ => TripDeskError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_tripdesk())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → TripDeskError */
/* -------------------------------------------------------------------------- */

impl IntoTripDeskError for JoinError {
    fn into_tripdesk(self) -> TripDeskError {
        if self.is_cancelled() {
            TripDeskError::Internal("blocking task cancelled".into())
        } else {
            TripDeskError::Internal(format!("blocking task failed: {self}"))
        }
    }
}

impl From<JoinError> for InfraError {
    fn from(value: JoinError) -> Self {
        InfraError(value.into_tripdesk())
    }
}

/* -------------------------------------------------------------------------- */
/* Classification */
/* -------------------------------------------------------------------------- */

impl ErrorClassification for InfraError {
    fn is_retryable(&self) -> bool {
        match &self.0 {
            TripDeskError::Database(message) => {
                message.contains("busy") || message.contains("locked")
            }
            _ => false,
        }
    }

    /// Configuration and internal failures abort a batch; everything else is
    /// a per-record error.
    fn severity(&self) -> ErrorSeverity {
        match &self.0 {
            TripDeskError::Config(_) | TripDeskError::Internal(_) => ErrorSeverity::Critical,
            TripDeskError::NotFound(_) | TripDeskError::Validation(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
