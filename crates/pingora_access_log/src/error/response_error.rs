use http::StatusCode;

/// Trait for converting errors into HTTP responses
///
/// This trait is inspired by actix-web's ResponseError trait and provides
/// a simple way to map errors onto a status code and a body.
pub trait ResponseError: std::error::Error + Send + Sync {
    /// Return the HTTP status code for this error.
    ///
    /// The default implementation returns 500 Internal Server Error.
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// JSON body sent to the client for this error.
    fn error_body(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string()
        })
    }
}
