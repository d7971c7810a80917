use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Ensure every request carries an `x-request-id`: keep the caller's id when
/// present, generate one otherwise, and echo it back on the response so the
/// id can be correlated across the frontend, its logs, and the backend.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // A caller-supplied id that is not a valid header value is dropped and
    // regenerated rather than propagated.
    let header_value = HeaderValue::from_str(&request_id)
        .or_else(|_| HeaderValue::from_str(&Uuid::new_v4().to_string()));

    match header_value {
        Ok(header_value) => {
            req.headers_mut()
                .insert(REQUEST_ID_HEADER, header_value.clone());
            let mut response = next.run(req).await;
            response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
            response
        }
        Err(_) => next.run(req).await,
    }
}

/// Span for one HTTP request, tagged with the id resolved by
/// [`request_id_middleware`]. Intended for `TraceLayer::make_span_with`, so
/// the request-id layer must run before the trace layer.
pub fn request_span<B>(request: &axum::http::Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
    )
}
