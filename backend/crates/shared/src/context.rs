//! Correlation Context
//!
//! Request-scoped holder of the correlation id. One value is established per
//! inbound request and handed down explicitly to everything that runs inside
//! that request's call graph. There is no global slot: two requests can only
//! share an id if they were given the same value.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Header carrying the correlation id in and out of the service
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound request id that is accepted verbatim
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation context for one inbound request
///
/// Cloning is cheap and yields the same id, which is how child tasks
/// inherit the context of the request that spawned them.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CorrelationContext {
    request_id: Arc<str>,
}

impl CorrelationContext {
    /// Fresh context with a random (UUID v4) request id
    pub fn new() -> Self {
        Self {
            request_id: Arc::from(Uuid::new_v4().to_string()),
        }
    }

    /// Context for an inbound request id, falling back to a fresh id when the
    /// caller-supplied value is absent or not acceptable as a header value.
    pub fn from_inbound(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(id) if is_acceptable_request_id(id) => Self {
                request_id: Arc::from(id),
            },
            _ => Self::new(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

impl Default for CorrelationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CorrelationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CorrelationContext")
            .field(&self.request_id)
            .finish()
    }
}

impl fmt::Display for CorrelationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.request_id)
    }
}

fn is_acceptable_request_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Handlers read the context the correlation middleware stored in the
/// request extensions. Without the middleware every request still gets its
/// own fresh context.
#[cfg(feature = "axum")]
impl<S> axum::extract::FromRequestParts<S> for CorrelationContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<CorrelationContext>() {
            return Ok(ctx.clone());
        }
        let inbound = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok());
        let ctx = CorrelationContext::from_inbound(inbound);
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_contexts_are_distinct() {
        let a = CorrelationContext::new();
        let b = CorrelationContext::new();
        assert_ne!(a.request_id(), b.request_id());
        assert!(Uuid::parse_str(a.request_id()).is_ok());
    }

    #[test]
    fn test_clone_inherits_request_id() {
        let parent = CorrelationContext::new();
        let child = parent.clone();
        assert_eq!(parent, child);
    }

    #[test]
    fn test_from_inbound_accepts_reasonable_ids() {
        let ctx = CorrelationContext::from_inbound(Some("req-42"));
        assert_eq!(ctx.request_id(), "req-42");

        let ctx = CorrelationContext::from_inbound(Some("  padded  "));
        assert_eq!(ctx.request_id(), "padded");
    }

    #[test]
    fn test_from_inbound_rejects_unusable_ids() {
        for bad in ["", "has space", "tab\there"] {
            let ctx = CorrelationContext::from_inbound(Some(bad));
            assert!(Uuid::parse_str(ctx.request_id()).is_ok(), "{bad:?}");
        }

        let too_long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        let ctx = CorrelationContext::from_inbound(Some(&too_long));
        assert_ne!(ctx.request_id(), too_long);

        let ctx = CorrelationContext::from_inbound(None);
        assert!(Uuid::parse_str(ctx.request_id()).is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_requests_keep_their_own_id() {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let ctx = CorrelationContext::from_inbound(Some(&format!("req-{i}")));
                tokio::spawn(async move {
                    tokio::task::yield_now().await;
                    (i, ctx.request_id().to_string())
                })
            })
            .collect();

        for handle in handles {
            let (i, seen) = handle.await.unwrap();
            assert_eq!(seen, format!("req-{i}"));
        }
    }
}
