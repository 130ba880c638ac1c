use std::time::Instant;

use axum::body::{to_bytes, Body, HttpBody};
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use taskboard_core::ValidationError;
use tracing::{debug, info, Level};

use crate::error::ApiError;
use crate::extract::MAX_BODY_BYTES;

/// Log method and path of every request, plus the body at debug level.
///
/// The body is only buffered when debug logging is on and its size is
/// known to be within [`MAX_BODY_BYTES`]; it is re-attached so downstream
/// extractors still see it. Larger or unsized bodies pass through unread
/// and the extractor enforces the limit.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    info!(%method, %path, "request");

    let request = if tracing::enabled!(Level::DEBUG) && body_fits(request.body()) {
        let (parts, body) = request.into_parts();
        let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return ApiError::from(ValidationError::MalformedBody(e.to_string()))
                    .into_response()
            }
        };
        if !bytes.is_empty() {
            debug!(%method, %path, body = %String::from_utf8_lossy(&bytes), "request body");
        }
        Request::from_parts(parts, Body::from(bytes))
    } else {
        request
    };

    let started = Instant::now();
    let response = next.run(request).await;
    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "response"
    );
    response
}

fn body_fits(body: &Body) -> bool {
    body.size_hint()
        .upper()
        .is_some_and(|len| len <= MAX_BODY_BYTES as u64)
}
