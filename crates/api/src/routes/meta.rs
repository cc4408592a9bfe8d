use axum::routing::get;
use axum::Router;

use crate::handlers::system;
use crate::state::AppState;

/// `/version` and `/docs`, mounted under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/version", get(system::version))
        .route("/docs", get(system::docs))
}
