use crate::types::DbId;

/// Closed failure taxonomy shared by the storage and HTTP layers.
///
/// Every low-level driver error is classified into one of these variants
/// before it leaves the storage crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Bad, missing or malformed field, or a malformed identifier.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// No active connection to the backing store.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Unique-constraint violation reported by the store.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias for fallible domain and storage operations.
pub type CoreResult<T> = Result<T, CoreError>;
