//! Fills in the `error` field of error envelopes in development mode.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ErrorDetail;
use crate::response::ErrorEnvelope;
use crate::state::AppState;

/// Re-render error responses with their diagnostic detail when
/// `expose_error_detail` is set. Other responses pass through untouched.
pub async fn expose_error_detail(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !state.config.expose_error_detail {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let detail = parts.extensions.remove::<ErrorDetail>();
    let envelope = parts.extensions.remove::<ErrorEnvelope>();

    match (envelope, detail) {
        (Some(mut envelope), Some(ErrorDetail(detail))) => {
            envelope.error = Some(detail);
            let rendered = Json(envelope).into_response();
            let (rendered_parts, rendered_body) = rendered.into_parts();
            parts.headers.remove(axum::http::header::CONTENT_LENGTH);
            parts.headers.extend(rendered_parts.headers);
            Response::from_parts(parts, rendered_body)
        }
        _ => Response::from_parts(parts, body),
    }
}
