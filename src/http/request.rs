use std::collections::HashMap;
use std::fmt;

/// Header that frames the request body. Unlike other headers it is matched
/// without regard to case.
pub const CONTENT_LENGTH: &str = "Content-Length";

/// HTTP request methods.
///
/// Only GET and POST are understood; any other verb is rejected while
/// parsing the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a file
    GET,
    /// POST - Submit a form
    POST,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the method (case-sensitive)
    ///
    /// # Returns
    ///
    /// `Some(Method)` if the string matches a known method, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use stile::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("PUT"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a parsed HTTP request from a client.
///
/// Built in one piece by the parser; nothing about it changes afterwards.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// Normalized path, without the query string. Directory paths already
    /// carry the trailing `index.html`.
    pub path: String,
    /// Protocol token from the request line, informational only
    pub version: String,
    /// Request headers as received; a repeated header keeps its last value
    pub headers: HashMap<String, String>,
    /// Query parameters from the raw request target
    pub query: HashMap<String, String>,
    /// Exactly `Content-Length` bytes of body
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    query: HashMap<String, String>,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(&mut self.headers, key.into(), value.into());
        self
    }

    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let path = self.path.ok_or("path missing")?;
        if !path.starts_with('/') {
            return Err("path must start with '/'");
        }

        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            query: self.query,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves a header value by its exact name.
    ///
    /// Names are kept as received, so `content-length` and `Content-Length`
    /// are different keys.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(key)
            .map(|v| v.as_str())
    }

    /// Retrieves a query parameter.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(|v| v.as_str())
    }

    /// Retrieves the Content-Length header value and parses it as a usize.
    ///
    /// The name matches in any case, exactly as the parser frames the body.
    /// Returns 0 if the header is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        content_length_header(&self.headers)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}

/// Stores a header, keeping the name as received. A repeated header keeps
/// its last value; for `Content-Length` that holds across spellings, so the
/// map never carries two of them.
pub fn insert_header(headers: &mut HashMap<String, String>, key: String, value: String) {
    if key.eq_ignore_ascii_case(CONTENT_LENGTH) {
        headers.retain(|k, _| !k.eq_ignore_ascii_case(CONTENT_LENGTH));
    }
    headers.insert(key, value);
}

/// The `Content-Length` value in whatever case it was sent.
pub fn content_length_header(headers: &HashMap<String, String>) -> Option<&str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(CONTENT_LENGTH))
        .map(|(_, v)| v.as_str())
}
