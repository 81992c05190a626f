//! Request routing
//!
//! Dispatches a parsed request by method and path to the file or login
//! handler. Both handlers share the process-wide stores through the
//! `Router`, which is cloned into every connection task behind an `Arc`.

pub mod handlers;

use std::fmt;

use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::store::{CredentialStore, FileStore};

/// Path answered with a redirect instead of a file.
pub const REDIRECT_FROM: &str = "/clown.png";
/// Target of the redirect.
pub const REDIRECT_TO: &str = "/redirect/clown.png";
/// The only path accepting POST.
pub const LOGIN_PATH: &str = "/login";

/// A method and path combination no handler accepts.
///
/// This is not turned into a response by the router; it escapes to the
/// connection, which answers 500.
#[derive(Debug)]
pub enum RoutingError {
    UnsupportedRoute { method: Method, path: String },
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingError::UnsupportedRoute { method, path } => {
                write!(f, "no route for {} {}", method, path)
            }
        }
    }
}

impl std::error::Error for RoutingError {}

/// Routes requests against the shared file and credential stores.
#[derive(Debug, Clone)]
pub struct Router {
    files: FileStore,
    credentials: CredentialStore,
}

impl Router {
    pub fn new(files: FileStore, credentials: CredentialStore) -> Self {
        Self { files, credentials }
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Produces the response for one request.
    ///
    /// File and credential failures come back as error responses; only an
    /// unsupported route is an `Err`.
    pub async fn route(&self, request: &Request) -> Result<Response, RoutingError> {
        match (request.method, request.path.as_str()) {
            (Method::GET, REDIRECT_FROM) => Ok(Response::redirect(REDIRECT_TO)),
            (Method::GET, path) => Ok(handlers::serve_file(&self.files, path).await),
            (Method::POST, LOGIN_PATH) => Ok(handlers::login(&self.credentials, &request.body)),
            (method, path) => Err(RoutingError::UnsupportedRoute {
                method,
                path: path.to_string(),
            }),
        }
    }
}
