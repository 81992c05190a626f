//! File serving and login handlers.

use url::form_urlencoded;

use crate::http::response::Response;
use crate::store::{CredentialStore, FileError, FileStore};

/// Serves the file behind `path` with the content type of its extension.
pub async fn serve_file(files: &FileStore, path: &str) -> Response {
    let content_type = match files.resolve(path).and_then(|_| files.mime_type(path)) {
        Ok(content_type) => content_type,
        Err(e) => return file_error_response(path, &e),
    };

    match files.read_bytes(path).await {
        Ok(body) => Response::ok(content_type, body),
        Err(e) => file_error_response(path, &e),
    }
}

/// Maps a sandboxed file failure to the response the client sees.
///
/// Sandbox violations answer 401 rather than 403.
pub fn file_error_response(path: &str, error: &FileError) -> Response {
    match error {
        FileError::NotFound => Response::not_found(),
        FileError::AccessDenied => Response::unauthorized(),
        FileError::UnknownMimeType => {
            tracing::debug!(path = %path, "Refusing to serve file with unknown content type");
            Response::bad_request()
        }
        FileError::Io(e) => {
            tracing::error!(path = %path, error = %e, "Failed to read file");
            Response::internal_error()
        }
    }
}

/// Checks form-encoded `username`/`password` fields against the table.
pub fn login(credentials: &CredentialStore, body: &[u8]) -> Response {
    let (username, password) = parse_credentials(body);

    if credentials.validate(&username, &password) {
        tracing::info!(user = %username, "Login accepted");
        Response::ok("text/plain", format!("Welcome, {}!", username))
    } else {
        tracing::info!(user = %username, "Login rejected");
        Response::unauthorized()
    }
}

/// Extracts `username` and `password` from an
/// `application/x-www-form-urlencoded` body. Missing fields are empty.
pub fn parse_credentials(body: &[u8]) -> (String, String) {
    let mut username = String::new();
    let mut password = String::new();

    for (key, value) in form_urlencoded::parse(body) {
        match key.as_ref() {
            "username" => username = value.into_owned(),
            "password" => password = value.into_owned(),
            _ => {}
        }
    }

    (username, password)
}
