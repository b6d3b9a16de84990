// Viewer context plumbing for the HTTP layer. The auth gateway (external
// collaborator) verifies the session token and forwards the resolved user
// id in `x-user-id`; requests without it run as anonymous.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::viewer::ViewerContext;

/// Arc-wrapped viewer context with reference-like ergonomics for handlers.
#[derive(Debug, Clone)]
pub struct Vc(Arc<ViewerContext>);

impl Vc {
    pub fn new(vc: Arc<ViewerContext>) -> Self {
        Self(vc)
    }
}

impl std::ops::Deref for Vc {
    type Target = ViewerContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<ViewerContext> for Vc {
    fn as_ref(&self) -> &ViewerContext {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Vc
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let vc = parts
            .extensions
            .get::<Arc<ViewerContext>>()
            .map(|vc| Vc(vc.clone()))
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR);

        async move { vc }
    }
}

/// Builds the per-request viewer context and stashes it in the request
/// extensions for the `Vc` extractor.
pub async fn viewer_context_middleware(mut request: Request, next: Next) -> Response {
    let user_id = request
        .headers()
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok());

    let vc = Arc::new(ViewerContext::new(
        user_id,
        uuid::Uuid::new_v4().to_string(),
    ));
    request.extensions_mut().insert(vc);

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vc_derefs_to_context() {
        let ctx = Arc::new(ViewerContext::new(Some(7), "req-1".to_string()));
        let vc = Vc::new(ctx);

        assert_eq!(vc.user_id, Some(7));
        assert_eq!(vc.request_id, "req-1");
        assert!(vc.is_authenticated());
    }

    #[test]
    fn anonymous_context_fails_require() {
        let vc = Vc::new(Arc::new(ViewerContext::anonymous()));
        assert!(vc.require_user().is_err());
    }
}
