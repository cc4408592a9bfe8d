pub mod health;
pub mod meta;
pub mod project;

use axum::Router;
use serde::Serialize;

use crate::handlers;
use crate::state::AppState;

/// One entry of the `/api/docs` listing.
#[derive(Debug, Serialize)]
pub struct RouteDoc {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// Every route the server answers, as reported by `/api/docs`.
pub const ROUTE_DOCS: &[RouteDoc] = &[
    RouteDoc {
        method: "GET",
        path: "/health",
        description: "Service, database and memory health",
    },
    RouteDoc {
        method: "GET",
        path: "/api/version",
        description: "Service name, version and environment",
    },
    RouteDoc {
        method: "GET",
        path: "/api/docs",
        description: "This route listing",
    },
    RouteDoc {
        method: "GET",
        path: "/api/projects",
        description: "List projects, newest first",
    },
    RouteDoc {
        method: "POST",
        path: "/api/projects",
        description: "Create a project",
    },
    RouteDoc {
        method: "GET",
        path: "/api/projects/{id}",
        description: "Fetch one project",
    },
    RouteDoc {
        method: "PUT",
        path: "/api/projects/{id}",
        description: "Update a project",
    },
    RouteDoc {
        method: "DELETE",
        path: "/api/projects/{id}",
        description: "Delete a project",
    },
];

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /version                 service version (GET)
/// /docs                    route listing (GET)
///
/// /projects                list, create
/// /projects/{id}           get, update, delete
/// ```
///
/// Anything else under `/api` answers 404 with the error envelope.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(meta::router())
        .nest("/projects", project::router())
        .fallback(handlers::system::api_not_found)
}
