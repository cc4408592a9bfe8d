use crate::error::CoreError;

/// Project identifiers are UUIDv7, assigned by the service on insert.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Parse a caller-supplied identifier (e.g. a `{id}` path segment).
///
/// Malformed identifiers are rejected here so they never reach storage.
pub fn parse_db_id(raw: &str) -> Result<DbId, CoreError> {
    uuid::Uuid::parse_str(raw.trim())
        .map_err(|_| CoreError::Validation(format!("Invalid id format: '{raw}'")))
}
