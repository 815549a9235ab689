use bytes::Bytes;

use super::ResponseError;
use crate::core::{CapabilityError, ResponseWriter};

/// Main error type for handlers, similar to actix_web::Error
///
/// This type wraps any ResponseError. It is rendered by the host only when
/// the handler has not produced a response of its own.
#[derive(Debug)]
pub struct WebError {
    inner: Box<dyn ResponseError>,
}

impl WebError {
    /// Create a new WebError from any ResponseError
    #[track_caller]
    pub fn new<T: ResponseError + 'static>(err: T) -> Self {
        Self {
            inner: Box::new(err),
        }
    }

    /// Get a reference to the underlying ResponseError
    pub fn as_response_error(&self) -> &dyn ResponseError {
        &*self.inner
    }

    /// Write this error as a JSON response through `w`.
    pub async fn write_to(&self, w: &mut dyn ResponseWriter) -> std::io::Result<()> {
        tracing::error!(
            status_code = %self.inner.status_code(),
            error = %self.inner,
            "Web error occurred",
        );

        let body = serde_json::to_vec(&self.inner.error_body()).unwrap_or_default();
        let headers = w.headers_mut();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        headers.insert(http::header::CONTENT_LENGTH, http::HeaderValue::from(body.len()));
        w.set_status(self.inner.status_code());
        w.write_body(Bytes::from(body)).await?;
        Ok(())
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl From<std::io::Error> for WebError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(err)
    }
}

impl From<serde_json::Error> for WebError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(err)
    }
}

impl From<CapabilityError> for WebError {
    #[track_caller]
    fn from(err: CapabilityError) -> Self {
        Self::new(err)
    }
}

impl From<crate::error::SimpleError> for WebError {
    #[track_caller]
    fn from(err: crate::error::SimpleError) -> Self {
        Self::new(err)
    }
}

// Implement ResponseError for WebError to allow nested errors
impl ResponseError for WebError {
    fn status_code(&self) -> http::StatusCode {
        self.inner.status_code()
    }

    fn error_body(&self) -> serde_json::Value {
        self.inner.error_body()
    }
}
