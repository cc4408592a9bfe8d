//! Translation of raw `sqlx` errors into the shared [`CoreError`] taxonomy.

use projectdeck_core::error::CoreError;

/// PostgreSQL SQLSTATE codes the repository distinguishes.
const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";
const NOT_NULL_VIOLATION: &str = "23502";

/// Check constraint keeping `end_date` on or after `start_date`.
const END_AFTER_START: &str = "ck_projects_end_after_start";

/// Whether an error means the link to the database itself is unusable.
///
/// These are the failures that should be treated as a lost connection
/// rather than a problem with the individual statement. `PoolTimedOut` is
/// not one of them: a saturated pool times out while the link is fine.
pub fn is_connection_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

/// Classify a sqlx error into a [`CoreError`].
///
/// - Unique violations map to `DuplicateKey`.
/// - Check and not-null violations map to `Validation`.
/// - Connection-class failures and pool timeouts map to `StorageUnavailable`.
/// - Everything else maps to `Internal`.
pub fn classify(err: sqlx::Error) -> CoreError {
    if is_connection_error(&err) || matches!(err, sqlx::Error::PoolTimedOut) {
        return CoreError::StorageUnavailable(err.to_string());
    }

    match &err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                CoreError::DuplicateKey(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ))
            }
            Some(CHECK_VIOLATION) | Some(NOT_NULL_VIOLATION) => match db_err.constraint() {
                Some(END_AFTER_START) => {
                    CoreError::Validation("endDate must not be before startDate".to_string())
                }
                constraint => CoreError::Validation(format!(
                    "Rejected by storage constraint: {}",
                    constraint.unwrap_or("unknown")
                )),
            },
            _ => {
                tracing::error!(error = %db_err, "Unclassified database error");
                CoreError::Internal(db_err.to_string())
            }
        },
        other => {
            tracing::error!(error = %other, "Database error");
            CoreError::Internal(other.to_string())
        }
    }
}
