//! Content types by file extension.
//!
//! Lookup is by extension only, through the `mime_guess` table; there is no
//! content sniffing and no fallback type. Callers decide what an unknown
//! extension means.

use std::path::Path;

/// Looks up a content type for an extension (without the dot), ignoring case.
///
/// # Example
///
/// ```
/// # use stile::http::mime;
/// assert_eq!(mime::from_extension("PNG"), Some("image/png"));
/// assert_eq!(mime::from_extension("notatype"), None);
/// ```
pub fn from_extension(ext: &str) -> Option<&'static str> {
    mime_guess::from_ext(ext).first_raw()
}

/// Content type for the extension of `path`, if it has a known one.
pub fn from_path(path: &Path) -> Option<&'static str> {
    mime_guess::from_path(path).first_raw()
}
