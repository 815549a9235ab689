//! Access-log line rendering.
//!
//! Plain lines read `GET /path ▶︎ 200 @ 1.2ms`. Colored lines put the
//! duration first (right-aligned), then the status on a background color
//! picked by [`StatusClass`], the method in its own foreground color, and a
//! dimmed path.

use std::time::Duration;

use http::{Method, StatusCode};

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

const STATUS_SUCCESS: &str = "\x1b[37m\x1b[42m";
const STATUS_REDIRECT: &str = "\x1b[37m\x1b[46m";
const STATUS_CLIENT_ERROR: &str = "\x1b[37m\x1b[43m";
const STATUS_ERROR: &str = "\x1b[37m\x1b[41m";

const METHOD_GET: &str = "\x1b[32m";
const METHOD_POST: &str = "\x1b[36m";
const METHOD_PUT_PATCH: &str = "\x1b[34m";
const METHOD_DELETE: &str = "\x1b[31m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Redirect,
    ClientError,
    /// Everything else, 1xx and 5xx included.
    Error,
}

impl StatusClass {
    pub fn of(status: StatusCode) -> Self {
        match status.as_u16() {
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirect,
            400..=499 => StatusClass::ClientError,
            _ => StatusClass::Error,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            StatusClass::Success => STATUS_SUCCESS,
            StatusClass::Redirect => STATUS_REDIRECT,
            StatusClass::ClientError => STATUS_CLIENT_ERROR,
            StatusClass::Error => STATUS_ERROR,
        }
    }
}

/// Foreground color for `method`; `None` leaves it uncolored.
pub fn method_color(method: &Method) -> Option<&'static str> {
    match *method {
        Method::GET => Some(METHOD_GET),
        Method::POST => Some(METHOD_POST),
        Method::PUT | Method::PATCH => Some(METHOD_PUT_PATCH),
        Method::DELETE => Some(METHOD_DELETE),
        _ => None,
    }
}

pub fn format_plain(method: &Method, path: &str, status: StatusCode, elapsed: Duration) -> String {
    format!(
        "{} {} \u{25B6}\u{FE0E} {} @ {:?}",
        method.as_str(),
        path,
        status.as_u16(),
        elapsed
    )
}

pub fn format_color(method: &Method, path: &str, status: StatusCode, elapsed: Duration) -> String {
    let duration = format!("{:?}", elapsed);
    let method_color = method_color(method).unwrap_or("");
    format!(
        "  {RESET}{DIM}{duration:>13}{RESET}   {RESET}{status_color} {status:3} {RESET}   {RESET}{method_color}{method}{RESET}  {RESET}{DIM}{path}{RESET}",
        status_color = StatusClass::of(status).color(),
        status = status.as_u16(),
        method = method.as_str(),
    )
}

pub fn format_line(
    color: bool,
    method: &Method,
    path: &str,
    status: StatusCode,
    elapsed: Duration,
) -> String {
    if color {
        format_color(method, path, status, elapsed)
    } else {
        format_plain(method, path, status, elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).expect("valid status")
    }

    #[test]
    fn status_classes_partition_every_code() {
        for code in 100..=999u16 {
            let expected = match code {
                200..=299 => StatusClass::Success,
                300..=399 => StatusClass::Redirect,
                400..=499 => StatusClass::ClientError,
                _ => StatusClass::Error,
            };
            assert_eq!(StatusClass::of(status(code)), expected, "code {}", code);
        }
    }

    #[test]
    fn informational_and_server_errors_share_error_class() {
        assert_eq!(StatusClass::of(status(101)), StatusClass::Error);
        assert_eq!(StatusClass::of(status(500)), StatusClass::Error);
        assert_eq!(StatusClass::of(status(503)), StatusClass::Error);
    }

    #[test]
    fn method_colors() {
        assert_eq!(method_color(&Method::GET), Some(METHOD_GET));
        assert_eq!(method_color(&Method::POST), Some(METHOD_POST));
        assert_eq!(method_color(&Method::PUT), Some(METHOD_PUT_PATCH));
        assert_eq!(method_color(&Method::PATCH), Some(METHOD_PUT_PATCH));
        assert_eq!(method_color(&Method::DELETE), Some(METHOD_DELETE));
        assert_eq!(method_color(&Method::OPTIONS), None);
        assert_eq!(method_color(&Method::HEAD), None);
        let custom = Method::from_bytes(b"PURGE").expect("method");
        assert_eq!(method_color(&custom), None);
    }

    #[test]
    fn plain_line_layout() {
        let line = format_plain(
            &Method::GET,
            "/",
            StatusCode::OK,
            Duration::from_micros(1500),
        );
        assert_eq!(line, "GET / \u{25B6}\u{FE0E} 200 @ 1.5ms");
    }

    #[test]
    fn color_line_layout() {
        let line = format_color(
            &Method::POST,
            "/users",
            StatusCode::CREATED,
            Duration::from_millis(2),
        );
        let expected = format!(
            "  {RESET}{DIM}{:>13}{RESET}   {RESET}{STATUS_SUCCESS} 201 {RESET}   {RESET}{METHOD_POST}POST{RESET}  {RESET}{DIM}/users{RESET}",
            "2ms"
        );
        assert_eq!(line, expected);
    }

    #[test]
    fn uncolored_method_still_wrapped_in_resets() {
        let line = format_color(&Method::OPTIONS, "/", StatusCode::NO_CONTENT, Duration::ZERO);
        assert!(line.contains(&format!("{RESET}OPTIONS{RESET}")));
    }

    #[test]
    fn format_line_switches_on_color() {
        let plain = format_line(false, &Method::GET, "/", StatusCode::OK, Duration::ZERO);
        assert!(!plain.contains('\x1b'));
        let colored = format_line(true, &Method::GET, "/", StatusCode::OK, Duration::ZERO);
        assert!(colored.contains(STATUS_SUCCESS));
    }
}
