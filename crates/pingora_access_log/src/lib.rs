//! Access logging for Pingora-based servers.
//!
//! [`LoggingHandler`] (or [`LoggingMiddleware`]) wraps a handler and writes
//! one line per request with the elapsed time, the response status, the
//! method and the path. The status is observed through [`StatusWriter`],
//! which records the first status decision the handler makes without
//! changing what reaches the client.
//!
//! Make sure to put the logger above any other handler to get accurate logs.

pub mod core;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod utils;

// Re-export commonly used types at the crate root
pub use self::core::*;
pub use error::WebError;
pub use http::StatusCode;
pub use logging::*;
pub use middleware::*;

use async_trait::async_trait;
use std::sync::Arc;
use pingora::protocols::http::ServerSession;
use pingora::services::listening::Service;
use pingora_core::apps::HttpServerApp;

/// The main application: holds the final handler and middleware.
pub struct App {
    handler: Arc<dyn Handler>,
    pub(crate) middlewares: Vec<Arc<dyn Middleware>>,
}

impl App {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            middlewares: Vec::new(),
        }
    }

    /// Later middlewares wrap earlier ones.
    pub fn use_middleware<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Arc::new(middleware));
    }

    /// Run the middleware chain and handler for one request.
    pub async fn handle(&self, req: Request, w: &mut dyn ResponseWriter) -> Result<(), WebError> {
        // Compose middlewares (onion model) around the handler
        let entry = compose(&self.middlewares, Arc::clone(&self.handler));
        entry.handle(req, w).await
    }

    /// Wrap the app in a Pingora listening service.
    pub fn to_service(self, name: &str) -> Service<App> {
        Service::new(name.to_string(), self)
    }

    /// Like [`App::handle`], but renders a returned error when the handler
    /// left the response untouched. Only writer I/O errors come back.
    pub async fn serve(&self, req: Request, w: &mut dyn ResponseWriter) -> std::io::Result<()> {
        let mut sw = StatusWriter::new(w);
        if let Err(err) = self.handle(req, &mut sw).await {
            if sw.is_sealed() {
                tracing::warn!(error = %err, "handler failed after response started");
            } else {
                err.write_to(&mut sw).await?;
            }
        }
        Ok(())
    }
}

use pingora::server::ShutdownWatch;
use pingora_core::apps::{HttpPersistentSettings, HttpServerOptions, ReusedHttpStream};

#[async_trait]
impl HttpServerApp for App {
    async fn process_new_http(
        self: &Arc<Self>,
        mut http: ServerSession,
        shutdown: &ShutdownWatch,
    ) -> Option<ReusedHttpStream> {
        // Read request header
        if !(http.read_request().await.ok()?) {
            return None;
        }
        if *shutdown.borrow() {
            http.set_keepalive(None);
        } else {
            http.set_keepalive(Some(60));
        }

        // Hand the handler the parts Pingora parsed, untouched
        let reqh = http.req_header();
        let is_head = reqh.method == Method::HEAD;

        let mut inner = http::Request::new(bytes::Bytes::new());
        *inner.method_mut() = reqh.method.clone();
        *inner.uri_mut() = reqh.uri.clone();
        *inner.version_mut() = reqh.version;
        *inner.headers_mut() = reqh.headers.clone();
        let mut req = Request::from(inner);

        // Read request body only when hinted by headers (content-length > 0 or transfer-encoding present)
        if !is_head {
            let has_te = req.headers().contains_key(http::header::TRANSFER_ENCODING);
            let has_len = req
                .headers()
                .get(http::header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(0)
                > 0;
            if (has_te || has_len)
                && let Ok(Some(bytes)) = http.read_request_body().await
            {
                req = req.with_body(bytes);
            }
        }

        let written = {
            let mut writer = SessionWriter::new(&mut http, is_head);
            match self.serve(req, &mut writer).await {
                Ok(()) => writer.finish().await,
                Err(e) => Err(e),
            }
        };
        if let Err(e) = written {
            tracing::debug!(error = %e, "failed to write response");
            return None;
        }

        let persistent_settings = HttpPersistentSettings::for_session(&http);
        match http.finish().await {
            Ok(c) => c.map(|s| ReusedHttpStream::new(s, Some(persistent_settings))),
            Err(_) => None,
        }
    }

    fn h2_options(&self) -> Option<pingora::protocols::http::v2::server::H2Options> {
        None
    }
    fn server_options(&self) -> Option<&HttpServerOptions> {
        None
    }
}
