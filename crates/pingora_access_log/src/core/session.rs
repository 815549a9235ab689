use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Response as HttpResponse, StatusCode};
use pingora::protocols::http::ServerSession;
use pingora_http::ResponseHeader;

use super::writer::{Flusher, ResponseWriter};

/// [`ResponseWriter`] over a Pingora server session.
///
/// The status and headers are staged until the first body write, a flush, or
/// `finish`, whichever comes first. Without a `content-length` the body is
/// sent chunked. For HEAD requests body bytes are accepted but not sent.
/// Hijack and push are not available on this writer.
pub struct SessionWriter<'a> {
    session: &'a mut ServerSession,
    status: StatusCode,
    status_set: bool,
    headers: HeaderMap,
    header_sent: bool,
    head_only: bool,
}

impl<'a> SessionWriter<'a> {
    pub fn new(session: &'a mut ServerSession, head_only: bool) -> Self {
        Self {
            session,
            status: StatusCode::OK,
            status_set: false,
            headers: HeaderMap::new(),
            header_sent: false,
            head_only,
        }
    }

    /// Send any pending header and terminate the body. Safe to follow with
    /// `ServerSession::finish`, which does not terminate the body twice.
    pub async fn finish(&mut self) -> std::io::Result<()> {
        self.send_header(Some(0)).await?;
        self.session
            .finish_body()
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))
    }

    async fn send_header(&mut self, known_len: Option<usize>) -> std::io::Result<()> {
        if self.header_sent {
            return Ok(());
        }

        if !self.head_only && status_allows_body(self.status) {
            let has_len = self.headers.contains_key(http::header::CONTENT_LENGTH)
                || self.headers.contains_key(http::header::TRANSFER_ENCODING);
            if !has_len {
                match known_len {
                    Some(len) => {
                        self.headers
                            .insert(http::header::CONTENT_LENGTH, HeaderValue::from(len));
                    }
                    None => {
                        self.headers.insert(
                            http::header::TRANSFER_ENCODING,
                            HeaderValue::from_static("chunked"),
                        );
                    }
                }
            }
        }

        let (mut parts, _) = HttpResponse::new(()).into_parts();
        parts.status = self.status;
        parts.headers = std::mem::take(&mut self.headers);
        let resp_header: ResponseHeader = parts.into();

        self.header_sent = true;
        self.session
            .write_response_header(Box::new(resp_header))
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))
    }
}

fn status_allows_body(status: StatusCode) -> bool {
    !(status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}

#[async_trait]
impl<'a> ResponseWriter for SessionWriter<'a> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn set_status(&mut self, status: StatusCode) {
        if self.status_set || self.header_sent {
            tracing::warn!(
                status = status.as_u16(),
                current = self.status.as_u16(),
                "superfluous set_status call"
            );
            return;
        }
        self.status = status;
        self.status_set = true;
    }

    async fn write_body(&mut self, data: Bytes) -> std::io::Result<usize> {
        self.send_header(None).await?;
        let len = data.len();
        if self.head_only || len == 0 {
            return Ok(len);
        }
        self.session
            .write_response_body(data, false)
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        Ok(len)
    }

    fn flusher(&mut self) -> Option<&mut dyn Flusher> {
        Some(self)
    }
}

#[async_trait]
impl<'a> Flusher for SessionWriter<'a> {
    /// Body chunks go out as they are written; flushing only forces the
    /// pending header onto the wire.
    async fn flush(&mut self) -> std::io::Result<()> {
        self.send_header(None).await
    }
}
