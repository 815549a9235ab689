use crate::core::Handler;
use crate::logging::format::format_line;
use crate::logging::{Logger, Options, StatusWriter, StderrLogger};
use crate::{
    core::{Request, ResponseWriter},
    error::WebError,
    middleware::Middleware,
};
use async_trait::async_trait;
use http::{Method, StatusCode};
use std::sync::Arc;
use std::time::Instant;

/// Handler that logs one line per request (duration, status, method, path)
/// around the handler it wraps.
///
/// Place it above any other handler to get accurate logs.
pub struct LoggingHandler {
    next: Arc<dyn Handler>,
    options: Options,
    logger: Arc<dyn Logger>,
}

impl LoggingHandler {
    /// `None` options behave like `Options::default()`.
    pub fn new(next: Arc<dyn Handler>, options: Option<Options>) -> Self {
        Self {
            next,
            options: options.unwrap_or_default(),
            logger: Arc::new(StderrLogger),
        }
    }

    pub fn with_logger<L: Logger + 'static>(mut self, logger: L) -> Self {
        self.logger = Arc::new(logger);
        self
    }
}

#[async_trait]
impl Handler for LoggingHandler {
    async fn handle(&self, req: Request, w: &mut dyn ResponseWriter) -> Result<(), WebError> {
        log_request(&self.options, &self.logger, req, w, self.next.as_ref()).await
    }
}

/// The same access log as [`LoggingHandler`], for use with `compose` and
/// `App::use_middleware`.
pub struct LoggingMiddleware {
    options: Options,
    logger: Arc<dyn Logger>,
}

impl LoggingMiddleware {
    pub fn new(options: Option<Options>) -> Self {
        Self {
            options: options.unwrap_or_default(),
            logger: Arc::new(StderrLogger),
        }
    }

    pub fn with_logger<L: Logger + 'static>(mut self, logger: L) -> Self {
        self.logger = Arc::new(logger);
        self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(
        &self,
        req: Request,
        w: &mut dyn ResponseWriter,
        next: Arc<dyn Handler>,
    ) -> Result<(), WebError> {
        log_request(&self.options, &self.logger, req, w, next.as_ref()).await
    }
}

/// Emits the access-log line when dropped, so the line is written on every
/// exit path of the downstream call: return, error, panic or cancellation.
struct AccessLogGuard<'a> {
    start: Instant,
    method: Method,
    path: String,
    writer: StatusWriter<'a>,
    /// Status of a returned error, used only if nothing sealed the writer.
    error_status: Option<StatusCode>,
    color: bool,
    logger: Arc<dyn Logger>,
}

impl Drop for AccessLogGuard<'_> {
    fn drop(&mut self) {
        let status = self
            .writer
            .status()
            .or(self.error_status)
            .unwrap_or(StatusCode::OK);
        let line = format_line(
            self.color,
            &self.method,
            &self.path,
            status,
            self.start.elapsed(),
        );
        self.logger.log(&line);
    }
}

async fn log_request(
    options: &Options,
    logger: &Arc<dyn Logger>,
    req: Request,
    w: &mut dyn ResponseWriter,
    next: &dyn Handler,
) -> Result<(), WebError> {
    // Keep originals in case downstream alters the request.
    let mut guard = AccessLogGuard {
        start: Instant::now(),
        method: req.method().clone(),
        path: req.path().to_string(),
        writer: StatusWriter::new(w),
        error_status: None,
        color: options.color,
        logger: Arc::clone(logger),
    };

    let result = next.handle(req, &mut guard.writer).await;

    if let Err(err) = &result
        && !guard.writer.is_sealed()
    {
        guard.error_status = Some(err.as_response_error().status_code());
    }
    result
}
