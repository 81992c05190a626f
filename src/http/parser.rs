use std::collections::HashMap;
use std::fmt;

use crate::http::request::{content_length_header, insert_header, Method, Request};
use crate::http::response::StatusCode;
use crate::store::{FileError, FileStore};

/// Largest request head (request line + headers) accepted, in bytes.
pub const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Largest declared body accepted, in bytes. Anything above is refused
/// before a single body byte is buffered.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

const INDEX_FILE: &str = "index.html";

#[derive(Debug)]
pub enum ParseError {
    /// Malformed request line, missing head, or a truncated request.
    InvalidRequest,
    /// Request line is well formed but the verb is not GET or POST.
    InvalidMethod,
    /// Content-Length is not a number or exceeds `MAX_BODY_BYTES`.
    InvalidContentLength,
    /// More bytes are needed before the request can be parsed.
    Incomplete,
    /// The sandbox refused the request path while normalizing it.
    File(FileError),
}

impl ParseError {
    /// Status code a client should receive for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::File(FileError::AccessDenied) => StatusCode::Unauthorized,
            ParseError::File(FileError::NotFound) => StatusCode::NotFound,
            ParseError::File(_) => StatusCode::InternalServerError,
            _ => StatusCode::BadRequest,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidRequest => write!(f, "invalid request"),
            ParseError::InvalidMethod => write!(f, "unsupported method"),
            ParseError::InvalidContentLength => write!(f, "invalid Content-Length"),
            ParseError::Incomplete => write!(f, "incomplete request"),
            ParseError::File(e) => write!(f, "path rejected: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::File(e) => Some(e),
            _ => None,
        }
    }
}

/// Parses one request from the start of `buf`.
///
/// Returns the request and the number of bytes it occupied, or
/// `ParseError::Incomplete` while the head or the declared body is still
/// missing bytes. Directory paths are normalized against `files`, which is
/// also where sandbox violations surface.
pub fn parse_http_request(buf: &[u8], files: &FileStore) -> Result<(Request, usize), ParseError> {

    // Look for the blank line closing the head
    let (head_len, body_start) = match find_head_end(buf) {
        Some(bounds) => bounds,
        None if buf.len() > MAX_HEAD_BYTES => return Err(ParseError::InvalidRequest),
        None => return Err(ParseError::Incomplete),
    };

    if head_len > MAX_HEAD_BYTES {
        return Err(ParseError::InvalidRequest);
    }

    let head = std::str::from_utf8(&buf[..head_len])
        .map_err(|_| ParseError::InvalidRequest)?;

    let mut lines = head.lines();

    // Request line: exactly three space separated tokens
    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let parts: Vec<&str> = request_line.split(' ').collect();
    let &[method_str, target, version] = parts.as_slice() else {
        return Err(ParseError::InvalidRequest);
    };

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;

    let (base_path, query_str) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };

    if !base_path.starts_with('/') {
        return Err(ParseError::InvalidRequest);
    }

    let query = query_str.map(parse_query).unwrap_or_default();

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        if let Some((key, value)) = line.split_once(':') {
            insert_header(
                &mut headers,
                key.trim().to_string(),
                value.trim().to_string(),
            );
        }
    }

    // Body
    let content_length = content_length_header(&headers)
        .map(|v| v.parse::<usize>().map_err(|_| ParseError::InvalidContentLength))
        .transpose()?
        .unwrap_or(0);

    if content_length > MAX_BODY_BYTES {
        return Err(ParseError::InvalidContentLength);
    }

    let body_bytes = &buf[body_start..];
    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let body = body_bytes[..content_length].to_vec();

    // Directory paths serve their index file
    let path = if files.is_directory(base_path).map_err(ParseError::File)? {
        if base_path.ends_with('/') {
            format!("{}{}", base_path, INDEX_FILE)
        } else {
            format!("{}/{}", base_path, INDEX_FILE)
        }
    } else {
        base_path.to_string()
    };

    let request = Request {
        method,
        path,
        version: version.to_string(),
        headers,
        query,
        body,
    };

    Ok((request, body_start + content_length))
}

/// Splits `a=1&b=2` into pairs. Tokens without `=` are dropped and values
/// are kept byte-for-byte, without percent-decoding.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Finds the blank line ending the head.
///
/// Returns the length of the head (request line and headers, without the
/// blank line) and the offset where the body starts. Both `\r\n` and bare
/// `\n` line endings are accepted.
fn find_head_end(buf: &[u8]) -> Option<(usize, usize)> {
    let mut start = 0;

    while let Some(offset) = buf[start..].iter().position(|&b| b == b'\n') {
        let end = start + offset;
        let line = &buf[start..end];

        if line.is_empty() || line == b"\r" {
            return Some((start, end + 1));
        }

        start = end + 1;
    }

    None
}
