//! Request correlation middleware
//!
//! Establishes one [`CorrelationContext`] per inbound request, from the
//! `x-request-id` header when the caller sent a usable one. The context is
//! stored in the request extensions for handlers, every log line emitted
//! while the request is in flight is tagged through the request span, and
//! the id is echoed back on the response.

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use kernel::context::{CorrelationContext, REQUEST_ID_HEADER};
use tracing::Instrument;

/// Wrap with `axum::middleware::from_fn(correlation_middleware)`
pub async fn correlation_middleware(mut request: Request, next: Next) -> Response {
    let inbound = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok());
    let ctx = CorrelationContext::from_inbound(inbound);

    request.extensions_mut().insert(ctx.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %ctx,
        method = %request.method(),
        uri = %request.uri(),
    );

    async move {
        tracing::debug!("Request started");

        let mut response = next.run(request).await;

        if let Ok(value) = HeaderValue::from_str(ctx.request_id()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        tracing::debug!(status = %response.status(), "Request completed");
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, middleware, routing::get};
    use tower::ServiceExt;

    async fn echo(ctx: CorrelationContext) -> String {
        ctx.request_id().to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(echo))
            .layer(middleware::from_fn(correlation_middleware))
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_inbound_request_id_is_propagated() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-123");
        assert_eq!(body_string(response).await, "req-123");
    }

    #[tokio::test]
    async fn test_request_id_generated_when_absent() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_string();
        assert!(!header.is_empty());
        assert_eq!(body_string(response).await, header);
    }

    #[tokio::test]
    async fn test_oversized_request_id_is_replaced() {
        let long = "x".repeat(500);
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, long.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_ne!(response.headers()[REQUEST_ID_HEADER], long.as_str());
    }

    #[tokio::test]
    async fn test_concurrent_requests_keep_their_own_ids() {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                tokio::spawn(async move {
                    let id = format!("req-{i}");
                    let response = app()
                        .oneshot(
                            Request::builder()
                                .uri("/")
                                .header(REQUEST_ID_HEADER, id.as_str())
                                .body(Body::empty())
                                .unwrap(),
                        )
                        .await
                        .unwrap();
                    (id, body_string(response).await)
                })
            })
            .collect();

        for handle in handles {
            let (sent, seen) = handle.await.unwrap();
            assert_eq!(sent, seen);
        }
    }
}
