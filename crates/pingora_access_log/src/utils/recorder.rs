use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};

use crate::core::{
    Flusher, Hijacked, HijackedStream, Hijacker, PushOptions, Pusher, ResponseWriter,
};

/// In-memory [`ResponseWriter`] for tests.
///
/// Behaves like a real protocol layer with respect to the status line: the
/// first `set_status` before any body write is what gets "sent", later calls
/// are recorded in `status_calls` but ignored. Flush is supported by default;
/// hijack and push are opt-in.
pub struct ResponseRecorder {
    pub headers: HeaderMap,
    pub body: BytesMut,
    /// Every status passed to `set_status`, in call order.
    pub status_calls: Vec<StatusCode>,
    pub flushes: usize,
    pub pushed: Vec<String>,
    sent_status: Option<StatusCode>,
    flush_supported: bool,
    push_supported: bool,
    hijack: Option<(Box<dyn HijackedStream>, Bytes)>,
    fail_writes: Option<std::io::ErrorKind>,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
            body: BytesMut::new(),
            status_calls: Vec::new(),
            flushes: 0,
            pushed: Vec::new(),
            sent_status: None,
            flush_supported: true,
            push_supported: false,
            hijack: None,
            fail_writes: None,
        }
    }

    pub fn without_flush(mut self) -> Self {
        self.flush_supported = false;
        self
    }

    pub fn with_push(mut self) -> Self {
        self.push_supported = true;
        self
    }

    /// Allow a single hijack handing out `stream`.
    pub fn with_hijack<S: HijackedStream + 'static>(mut self, stream: S, read_buf: Bytes) -> Self {
        self.hijack = Some((Box::new(stream), read_buf));
        self
    }

    /// Make every body write fail with `kind`.
    pub fn failing_writes(mut self, kind: std::io::ErrorKind) -> Self {
        self.fail_writes = Some(kind);
        self
    }

    /// Status the client would see; 200 when nothing set one.
    pub fn status(&self) -> StatusCode {
        self.sent_status.unwrap_or(StatusCode::OK)
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or("")
    }
}

impl Default for ResponseRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseWriter for ResponseRecorder {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn set_status(&mut self, status: StatusCode) {
        self.status_calls.push(status);
        if self.sent_status.is_none() {
            self.sent_status = Some(status);
        }
    }

    async fn write_body(&mut self, data: Bytes) -> std::io::Result<usize> {
        if let Some(kind) = self.fail_writes {
            return Err(std::io::Error::new(kind, "recorder write failure"));
        }
        if self.sent_status.is_none() {
            self.sent_status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(&data);
        Ok(data.len())
    }

    fn flusher(&mut self) -> Option<&mut dyn Flusher> {
        if self.flush_supported {
            Some(self)
        } else {
            None
        }
    }

    fn hijacker(&mut self) -> Option<&mut dyn Hijacker> {
        if self.hijack.is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn pusher(&mut self) -> Option<&mut dyn Pusher> {
        if self.push_supported {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl Flusher for ResponseRecorder {
    async fn flush(&mut self) -> std::io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[async_trait]
impl Hijacker for ResponseRecorder {
    async fn hijack(&mut self) -> std::io::Result<Hijacked> {
        let (stream, read_buf) = self.hijack.take().ok_or_else(|| {
            std::io::Error::other("connection already hijacked")
        })?;
        Ok(Hijacked { stream, read_buf })
    }
}

#[async_trait]
impl Pusher for ResponseRecorder {
    async fn push(&mut self, target: &str, _opts: PushOptions) -> std::io::Result<()> {
        self.pushed.push(target.to_string());
        Ok(())
    }
}
