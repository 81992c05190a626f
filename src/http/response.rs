/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): File served or login accepted
/// - `Found` (302): Redirect, carries a `Location` and no body
/// - `BadRequest` (400): Malformed request
/// - `Unauthorized` (401): Bad credentials, or a path outside the root
/// - `NotFound` (404): No file behind the path
/// - `InternalServerError` (500): Anything else that went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 302 Found
    Found,
    /// 400 Bad Request
    BadRequest,
    /// 401 Unauthorized
    Unauthorized,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

/// Per-status wire metadata.
#[derive(Debug)]
pub struct StatusInfo {
    pub code: u16,
    pub reason: &'static str,
    /// Content type used when the handler gives none. `None` marks a
    /// headers-only response: no Content-Type, no Content-Length, no body.
    pub content_type: Option<&'static str>,
    /// Whether a body is sent at all.
    pub body: bool,
}

// Indexed by `StatusCode as usize`; keep in declaration order.
const STATUS_TABLE: [StatusInfo; 6] = [
    StatusInfo { code: 200, reason: "OK", content_type: Some("text/plain"), body: true },
    StatusInfo { code: 302, reason: "Found", content_type: None, body: false },
    StatusInfo { code: 400, reason: "Bad Request", content_type: Some("text/plain"), body: true },
    StatusInfo { code: 401, reason: "Unauthorized", content_type: Some("text/plain"), body: false },
    StatusInfo { code: 404, reason: "Not Found", content_type: Some("text/plain"), body: false },
    StatusInfo { code: 500, reason: "Internal Server Error", content_type: Some("text/plain"), body: true },
];

impl StatusCode {
    pub fn info(&self) -> &'static StatusInfo {
        &STATUS_TABLE[*self as usize]
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use stile::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Found.as_u16(), 302);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.info().code
    }

    /// Returns the fixed reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use stile::http::response::StatusCode;
    /// assert_eq!(StatusCode::Unauthorized.reason_phrase(), "Unauthorized");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        self.info().reason
    }

    /// True for 4xx and 5xx statuses.
    pub fn is_error(&self) -> bool {
        self.as_u16() >= 400
    }

    /// True for statuses written without Content-Type, Content-Length or body.
    pub fn is_headers_only(&self) -> bool {
        self.info().content_type.is_none()
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Content type; `None` only for headers-only statuses
    pub content_type: Option<String>,
    /// Redirect target, only set for 302
    pub location: Option<String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// `build` applies the status table: error statuses always get
/// `text/plain`, headers-only statuses drop content type and body, and
/// statuses without a body drop whatever body was set.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("text/html")
///     .body(b"<h1>hi</h1>".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    content_type: Option<String>,
    location: Option<String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            location: None,
            body: Vec::new(),
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the final Response.
    pub fn build(self) -> Response {
        let info = self.status.info();

        let content_type = match info.content_type {
            None => None,
            Some(default) if self.status.is_error() => Some(default.to_string()),
            Some(default) => Some(self.content_type.unwrap_or_else(|| default.to_string())),
        };

        let location = if self.status == StatusCode::Found {
            self.location
        } else {
            None
        };

        let body = if info.body { self.body } else { Vec::new() };

        Response {
            status: self.status,
            content_type,
            location,
            body,
        }
    }
}

impl Response {
    /// Creates a 200 OK response with the given content type and body.
    pub fn ok(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .content_type(content_type)
            .body(body)
            .build()
    }

    /// Creates a 302 Found redirect to `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::Found)
            .location(location)
            .build()
    }

    /// Creates an error response whose body, if the status carries one, is
    /// just the reason phrase.
    pub fn error(status: StatusCode) -> Self {
        ResponseBuilder::new(status)
            .body(status.reason_phrase().as_bytes().to_vec())
            .build()
    }

    pub fn bad_request() -> Self {
        Self::error(StatusCode::BadRequest)
    }

    pub fn unauthorized() -> Self {
        Self::error(StatusCode::Unauthorized)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::error(StatusCode::NotFound)
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        Self::error(StatusCode::InternalServerError)
    }

    /// Value of the Content-Length header for this response.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}
