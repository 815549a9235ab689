use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, Uri};

#[derive(Debug)]
pub struct Request {
    pub inner: http::Request<Bytes>,
}

impl Request {
    pub fn new<M: Into<Method>, S: AsRef<str>>(method: M, path: S) -> Self {
        let mut inner = http::Request::new(Bytes::new());
        *inner.method_mut() = method.into();
        *inner.uri_mut() = parse_path(path.as_ref());
        Self { inner }
    }

    /// Appends, so repeated names keep every value.
    pub fn header<K, V>(mut self, k: K, v: V) -> Self
    where
        K: TryInto<http::HeaderName>,
        V: TryInto<HeaderValue>,
        K::Error: std::fmt::Debug,
        V::Error: std::fmt::Debug,
    {
        if let (Ok(key), Ok(value)) = (k.try_into(), v.try_into()) {
            self.inner.headers_mut().append(key, value);
        }
        self
    }

    pub fn with_body<B: Into<Bytes>>(mut self, body: B) -> Self {
        *self.inner.body_mut() = body.into();
        self
    }

    // Convenience accessors for the inner http::Request
    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn method_mut(&mut self) -> &mut Method {
        self.inner.method_mut()
    }

    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    pub fn uri_mut(&mut self) -> &mut Uri {
        self.inner.uri_mut()
    }

    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    pub fn headers(&self) -> &HeaderMap<HeaderValue> {
        self.inner.headers()
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap<HeaderValue> {
        self.inner.headers_mut()
    }

    pub fn body(&self) -> &Bytes {
        self.inner.body()
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(inner: http::Request<Bytes>) -> Self {
        Self { inner }
    }
}

/// Parse `path` as a request target, percent-encoding the ASCII bytes the
/// URI grammar rejects when a plain parse fails.
fn parse_path(path: &str) -> Uri {
    if let Ok(uri) = path.parse() {
        return uri;
    }
    let mut escaped = String::with_capacity(path.len() + 8);
    if !path.starts_with('/') {
        escaped.push('/');
    }
    for c in path.chars() {
        let rejected = c.is_ascii_control()
            || matches!(c, ' ' | '"' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}');
        if rejected {
            escaped.push_str(&format!("%{:02X}", c as u8));
        } else {
            escaped.push(c);
        }
    }
    escaped
        .parse()
        .unwrap_or_else(|_| Uri::from_static("/"))
}
