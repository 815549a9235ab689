use async_trait::async_trait;
use std::sync::Arc;

use crate::core::{Handler, Request, ResponseWriter};
use crate::error::WebError;

/// Middleware trait for processing requests
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    /// Process the request, optionally calling the next handler
    async fn handle(
        &self,
        req: Request,
        w: &mut dyn ResponseWriter,
        next: Arc<dyn Handler>,
    ) -> Result<(), WebError>;
}

/// Wrapper that implements Handler for middleware composition
struct MiddlewareHandler {
    middleware: Arc<dyn Middleware>,
    next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for MiddlewareHandler {
    async fn handle(&self, req: Request, w: &mut dyn ResponseWriter) -> Result<(), WebError> {
        self.middleware.handle(req, w, Arc::clone(&self.next)).await
    }
}

/// Compose multiple middlewares around a final handler
/// Creates an onion model where the last middleware wraps all previous ones
pub fn compose(
    middlewares: &[Arc<dyn Middleware>],
    final_handler: Arc<dyn Handler>,
) -> Arc<dyn Handler> {
    let mut current_handler = final_handler;

    // Walk front to back so later registrations end up outermost
    for middleware in middlewares {
        current_handler = Arc::new(MiddlewareHandler {
            middleware: Arc::clone(middleware),
            next: current_handler,
        });
    }

    current_handler
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Method;
    use crate::utils::ResponseRecorder;
    use bytes::Bytes;

    struct Tag(&'static str);

    #[async_trait]
    impl Middleware for Tag {
        async fn handle(
            &self,
            req: Request,
            w: &mut dyn ResponseWriter,
            next: Arc<dyn Handler>,
        ) -> Result<(), WebError> {
            w.write_body(Bytes::from_static(self.0.as_bytes())).await?;
            next.handle(req, w).await
        }
    }

    struct Done;

    #[async_trait]
    impl Handler for Done {
        async fn handle(&self, _req: Request, w: &mut dyn ResponseWriter) -> Result<(), WebError> {
            w.write_body(Bytes::from_static(b"H")).await?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn last_registered_runs_first() {
        let middlewares: Vec<Arc<dyn Middleware>> = vec![Arc::new(Tag("A>")), Arc::new(Tag("B>"))];
        let entry = compose(&middlewares, Arc::new(Done));

        let mut rec = ResponseRecorder::new();
        entry
            .handle(Request::new(Method::GET, "/"), &mut rec)
            .await
            .expect("ok");
        assert_eq!(rec.body_str(), "B>A>H");
    }

    #[tokio::test]
    async fn no_middlewares_is_the_final_handler() {
        let entry = compose(&[], Arc::new(Done));
        let mut rec = ResponseRecorder::new();
        entry
            .handle(Request::new(Method::GET, "/"), &mut rec)
            .await
            .expect("ok");
        assert_eq!(rec.body_str(), "H");
    }
}
