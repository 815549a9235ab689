use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use tokio::io::{AsyncRead, AsyncWrite};

/// The outbound half of a request: staged headers, a status line and body bytes.
///
/// Writers may expose extra capabilities (flush, connection takeover, server
/// push). Those are discovered at runtime through the `flusher`, `hijacker`
/// and `pusher` queries, which return `None` unless the writer supports them.
#[async_trait]
pub trait ResponseWriter: Send {
    /// Headers that will be sent with the response.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Set the response status. Only meaningful before the first body write.
    fn set_status(&mut self, status: StatusCode);

    /// Write body bytes, returning how many were accepted.
    async fn write_body(&mut self, data: Bytes) -> std::io::Result<usize>;

    fn flusher(&mut self) -> Option<&mut dyn Flusher> {
        None
    }

    fn hijacker(&mut self) -> Option<&mut dyn Hijacker> {
        None
    }

    fn pusher(&mut self) -> Option<&mut dyn Pusher> {
        None
    }
}

/// Push buffered response data to the client.
#[async_trait]
pub trait Flusher: Send {
    async fn flush(&mut self) -> std::io::Result<()>;
}

/// Take over the underlying connection, e.g. for a protocol upgrade.
#[async_trait]
pub trait Hijacker: Send {
    async fn hijack(&mut self) -> std::io::Result<Hijacked>;
}

/// Initiate a server push for `target`.
#[async_trait]
pub trait Pusher: Send {
    async fn push(&mut self, target: &str, opts: PushOptions) -> std::io::Result<()>;
}

/// Raw bidirectional stream handed over by a hijack.
pub trait HijackedStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> HijackedStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// A connection taken over from the HTTP layer.
pub struct Hijacked {
    pub stream: Box<dyn HijackedStream>,
    /// Bytes already read from the connection but not consumed by the HTTP layer.
    pub read_buf: Bytes,
}

impl std::fmt::Debug for Hijacked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hijacked")
            .field("read_buf", &self.read_buf.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct PushOptions {
    pub method: Method,
    pub headers: HeaderMap,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
        }
    }
}
