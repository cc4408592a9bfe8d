//! Connection gate for data routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use projectdeck_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the database was connected when the request arrived.
///
/// Put this first in a handler's argument list so a closed gate answers 503
/// before any path, body or store work happens:
///
/// ```ignore
/// async fn list(_db: RequireStorage, State(state): State<AppState>) -> AppResult<...> {
///     ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireStorage;

impl FromRequestParts<AppState> for RequireStorage {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.connections.is_connected() {
            return Ok(RequireStorage);
        }

        let status = state.connections.status();
        tracing::debug!(state = status.state.as_str(), "Rejecting request, database not connected");
        Err(AppError::Core(CoreError::StorageUnavailable(format!(
            "Database connection is {}",
            status.state.as_str()
        ))))
    }
}
