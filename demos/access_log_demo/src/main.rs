use async_trait::async_trait;
use bytes::Bytes;
use http::HeaderValue;
use http::header::{CONTENT_TYPE, LOCATION};
use pingora::server::Server;
use pingora_access_log::core::capability;
use pingora_access_log::{
    App, Handler, LoggingMiddleware, Options, PanicRecoveryMiddleware, Request,
    ResponseWriter, StatusCode, WebError, error,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Path-based dispatch for the demo; a real server would put a router here.
struct Demo;

impl Demo {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait]
impl Handler for Demo {
    async fn handle(&self, req: Request, w: &mut dyn ResponseWriter) -> Result<(), WebError> {
        match (req.method().as_str(), req.path()) {
            ("GET", "/") => {
                w.write_body(Bytes::from_static(b"Hello")).await?;
            }
            ("POST", "/users") => {
                let body = serde_json::to_vec(&serde_json::json!({ "id": 1 }))?;
                w.headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                w.set_status(StatusCode::CREATED);
                w.write_body(Bytes::from(body)).await?;
            }
            ("GET", "/old") => {
                w.headers_mut()
                    .insert(LOCATION, HeaderValue::from_static("/"));
                w.set_status(StatusCode::MOVED_PERMANENTLY);
            }
            ("GET", "/stream") => {
                for i in 0..5 {
                    w.write_body(Bytes::from(format!("chunk {}\n", i))).await?;
                    capability::flush(w).await?;
                    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                }
            }
            ("GET", "/upgrade") => {
                // Pingora sessions cannot be hijacked; this answers 501.
                let _conn = capability::hijack(w).await?;
            }
            ("GET", "/panic") => {
                panic!("demo panic");
            }
            (_, path) => return Err(error::not_found(format!("no route for {}", path))),
        }
        Ok(())
    }
}

fn main() {
    // Default INFO level, overridable through RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let color = std::env::var("ACCESS_LOG_COLOR")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let addr = std::env::var("ACCESS_LOG_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let mut app = App::new(Demo::new());
    // Recovery sits below the logger so a panic is logged as a 500.
    app.use_middleware(PanicRecoveryMiddleware::new());
    app.use_middleware(LoggingMiddleware::new(Some(Options { color })));

    tracing::info!(%addr, color, "starting access log demo");
    tracing::info!("routes: GET /, POST /users, GET /old, GET /stream, GET /upgrade, GET /panic");

    if let Err(e) = run_server(app, &addr) {
        eprintln!("Pingora server error: {e}");
    }
}

fn run_server(app: App, addr: &str) -> std::io::Result<()> {
    let mut server = Server::new(None).map_err(|e| std::io::Error::other(e.to_string()))?;
    server.bootstrap();

    let mut service = app.to_service("Access Log Demo HTTP");
    service.add_tcp(addr);
    server.add_services(vec![Box::new(service)]);

    server.run_forever()
}
