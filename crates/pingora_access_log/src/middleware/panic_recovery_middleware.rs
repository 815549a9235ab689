use async_trait::async_trait;
use bytes::Bytes;
use futures::FutureExt;
use http::StatusCode;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use super::Middleware;
use crate::core::{Handler, Request, ResponseWriter};
use crate::error::{self, WebError};
use crate::logging::StatusWriter;

/// Simple panic recovery middleware that catches panics and returns 500 errors
///
/// If the handler had already started its response the status can no longer
/// change; the panic is then reported as an error to the caller instead.
pub struct PanicRecoveryMiddleware;

impl PanicRecoveryMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PanicRecoveryMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Middleware for PanicRecoveryMiddleware {
    async fn handle(
        &self,
        req: Request,
        w: &mut dyn ResponseWriter,
        next: Arc<dyn Handler>,
    ) -> Result<(), WebError> {
        let mut sw = StatusWriter::new(w);

        // Wrap the next handler call in a catch_unwind
        let result = AssertUnwindSafe(next.handle(req, &mut sw))
            .catch_unwind()
            .await;

        let panic_info = match result {
            Ok(res) => return res,
            Err(panic_info) => panic_info,
        };

        // Extract panic message if possible
        let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic occurred".to_string()
        };

        tracing::error!("Panic caught in request handler: {}", panic_msg);

        if sw.is_sealed() {
            return Err(error::internal_error(format!(
                "handler panicked after responding: {}",
                panic_msg
            )));
        }

        sw.headers_mut().insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        sw.set_status(StatusCode::INTERNAL_SERVER_ERROR);
        sw.write_body(Bytes::from_static(b"Internal Server Error"))
            .await?;
        Ok(())
    }
}
