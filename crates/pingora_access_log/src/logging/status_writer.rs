use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::core::{Flusher, Hijacker, Pusher, ResponseWriter};

/// Wraps a [`ResponseWriter`] and records the response status.
///
/// The status is sealed by whichever comes first: a `set_status` call, or a
/// body write (which implies 200). Later `set_status` calls are still
/// forwarded but do not change what was recorded. Capability queries are
/// passed straight through to the wrapped writer.
pub struct StatusWriter<'a> {
    inner: &'a mut dyn ResponseWriter,
    status: Option<StatusCode>,
}

impl<'a> StatusWriter<'a> {
    pub fn new(inner: &'a mut dyn ResponseWriter) -> Self {
        Self {
            inner,
            status: None,
        }
    }

    /// The sealed status, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn is_sealed(&self) -> bool {
        self.status.is_some()
    }

    pub fn status_or_default(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }
}

#[async_trait]
impl<'a> ResponseWriter for StatusWriter<'a> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn set_status(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
        self.inner.set_status(status);
    }

    async fn write_body(&mut self, data: Bytes) -> std::io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.inner.write_body(data).await
    }

    fn flusher(&mut self) -> Option<&mut dyn Flusher> {
        self.inner.flusher()
    }

    fn hijacker(&mut self) -> Option<&mut dyn Hijacker> {
        self.inner.hijacker()
    }

    fn pusher(&mut self) -> Option<&mut dyn Pusher> {
        self.inner.pusher()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PushOptions, capability};
    use crate::utils::ResponseRecorder;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).expect("valid status")
    }

    #[test]
    fn starts_unsealed() {
        let mut rec = ResponseRecorder::new();
        let sw = StatusWriter::new(&mut rec);
        assert!(!sw.is_sealed());
        assert_eq!(sw.status(), None);
        assert_eq!(sw.status_or_default(), StatusCode::OK);
    }

    #[test]
    fn first_set_status_wins_and_every_call_is_forwarded() {
        let mut rec = ResponseRecorder::new();
        {
            let mut sw = StatusWriter::new(&mut rec);
            sw.set_status(StatusCode::NOT_FOUND);
            sw.set_status(StatusCode::OK);
            sw.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(sw.status(), Some(StatusCode::NOT_FOUND));
        }
        assert_eq!(
            rec.status_calls,
            vec![
                StatusCode::NOT_FOUND,
                StatusCode::OK,
                StatusCode::INTERNAL_SERVER_ERROR
            ]
        );
    }

    #[tokio::test]
    async fn write_without_status_seals_ok() {
        let mut rec = ResponseRecorder::new();
        {
            let mut sw = StatusWriter::new(&mut rec);
            let n = sw.write_body(Bytes::from_static(b"Hello")).await.expect("write");
            assert_eq!(n, 5);
            sw.set_status(StatusCode::IM_A_TEAPOT);
            assert_eq!(sw.status(), Some(StatusCode::OK));
        }
        assert_eq!(rec.body_str(), "Hello");
        assert_eq!(rec.status_calls, vec![StatusCode::IM_A_TEAPOT]);
    }

    #[tokio::test]
    async fn status_then_write_keeps_status() {
        let mut rec = ResponseRecorder::new();
        let mut sw = StatusWriter::new(&mut rec);
        sw.set_status(StatusCode::CREATED);
        sw.write_body(Bytes::from_static(b"{}")).await.expect("write");
        sw.write_body(Bytes::from_static(b"{}")).await.expect("write");
        assert_eq!(sw.status(), Some(StatusCode::CREATED));
    }

    #[tokio::test]
    async fn captured_status_follows_first_event_for_any_sequence() {
        let sequences: Vec<(Vec<u16>, usize)> = vec![
            (vec![], 0),
            (vec![], 3),
            (vec![204], 0),
            (vec![301, 200], 1),
            (vec![404, 500, 200], 2),
            (vec![503], 5),
        ];
        for (statuses, writes) in sequences {
            let mut rec = ResponseRecorder::new();
            let mut sw = StatusWriter::new(&mut rec);
            for code in &statuses {
                sw.set_status(status(*code));
            }
            for _ in 0..writes {
                sw.write_body(Bytes::from_static(b"x")).await.expect("write");
            }
            let expected = statuses.first().map(|c| status(*c));
            let expected = expected.or(if writes > 0 { Some(StatusCode::OK) } else { None });
            assert_eq!(sw.status(), expected, "{:?} then {} writes", statuses, writes);
            assert_eq!(sw.status_or_default(), expected.unwrap_or(StatusCode::OK));
        }
    }

    #[tokio::test]
    async fn write_errors_pass_through_and_still_seal() {
        let mut rec = ResponseRecorder::new().failing_writes(std::io::ErrorKind::BrokenPipe);
        let mut sw = StatusWriter::new(&mut rec);
        let err = sw
            .write_body(Bytes::from_static(b"x"))
            .await
            .expect_err("write fails");
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
        assert_eq!(err.to_string(), "recorder write failure");
        assert_eq!(sw.status(), Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn headers_reach_inner_writer() {
        let mut rec = ResponseRecorder::new();
        {
            let mut sw = StatusWriter::new(&mut rec);
            sw.headers_mut()
                .insert("x-test", http::HeaderValue::from_static("1"));
        }
        assert!(rec.headers.contains_key("x-test"));
    }

    #[tokio::test]
    async fn flush_is_forwarded_when_supported() {
        let mut rec = ResponseRecorder::new();
        {
            let mut sw = StatusWriter::new(&mut rec);
            capability::flush(&mut sw).await.expect("flush");
            assert!(!sw.is_sealed());
        }
        assert_eq!(rec.flushes, 1);
    }

    #[tokio::test]
    async fn flush_is_a_noop_when_unsupported() {
        let mut rec = ResponseRecorder::new().without_flush();
        let mut sw = StatusWriter::new(&mut rec);
        assert!(sw.flusher().is_none());
        capability::flush(&mut sw).await.expect("noop flush");
    }

    #[tokio::test]
    async fn hijack_is_forwarded_when_supported() {
        let (server, mut client) = tokio::io::duplex(64);
        let mut rec =
            ResponseRecorder::new().with_hijack(server, Bytes::from_static(b"leftover"));
        let mut sw = StatusWriter::new(&mut rec);

        let mut hijacked = capability::hijack(&mut sw).await.expect("hijack");
        assert_eq!(hijacked.read_buf.as_ref(), b"leftover");

        hijacked.stream.write_all(b"ping").await.expect("write");
        let mut buf = [0u8; 4];
        client.read_exact(&mut buf).await.expect("read");
        assert_eq!(&buf, b"ping");
    }

    #[tokio::test]
    async fn hijack_is_not_supported_without_capability() {
        let mut rec = ResponseRecorder::new();
        let mut sw = StatusWriter::new(&mut rec);
        let err = capability::hijack(&mut sw).await.expect_err("unsupported");
        assert!(matches!(
            err,
            crate::core::CapabilityError::NotSupported(crate::core::Capability::Hijack)
        ));
    }

    #[tokio::test]
    async fn push_is_forwarded_when_supported() {
        let mut rec = ResponseRecorder::new().with_push();
        {
            let mut sw = StatusWriter::new(&mut rec);
            capability::push(&mut sw, "/style.css", PushOptions::default())
                .await
                .expect("push");
        }
        assert_eq!(rec.pushed, vec!["/style.css".to_string()]);
    }
}
