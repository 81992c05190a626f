//! Sandboxed access to the document root.
//!
//! Every operation maps a client-supplied logical path (e.g. `/img/a.png`)
//! onto the root and refuses anything that ends up outside of it. The check
//! runs twice: once lexically, so that `..` sequences are rejected even when
//! the target does not exist, and once on the canonical path, so that
//! symlinks pointing out of the root are rejected too.

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::http::mime;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Failures of a sandboxed file operation.
#[derive(Debug)]
pub enum FileError {
    /// The path resolves outside of the root directory.
    AccessDenied,
    /// Nothing exists at the resolved path.
    NotFound,
    /// The extension is missing or has no known content type.
    UnknownMimeType,
    /// Any other filesystem failure.
    Io(io::Error),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::AccessDenied => write!(f, "access outside of the root directory is prohibited"),
            FileError::NotFound => write!(f, "requested file does not exist"),
            FileError::UnknownMimeType => write!(f, "unknown content type"),
            FileError::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            // Names the filesystem cannot even represent (too long, NUL bytes)
            // cannot exist under the root either
            io::ErrorKind::NotFound
            | io::ErrorKind::NotADirectory
            | io::ErrorKind::InvalidFilename
            | io::ErrorKind::InvalidInput => FileError::NotFound,
            io::ErrorKind::PermissionDenied => FileError::AccessDenied,
            _ => FileError::Io(e),
        }
    }
}

/// Read/write access to a single root directory fixed at construction.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root`.
    ///
    /// The root is canonicalized once here; it must exist and be a directory.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = std::fs::canonicalize(root.as_ref())?;

        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", root.display()),
            ));
        }

        Ok(Self { root })
    }

    /// The canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a logical path to the canonical path of an existing entry.
    ///
    /// # Errors
    ///
    /// * `AccessDenied` if the path escapes the root, lexically or through a symlink
    /// * `NotFound` if nothing exists at the resolved location
    pub fn resolve(&self, logical: &str) -> Result<PathBuf, FileError> {
        let joined = self.join(logical)?;
        let canonical = std::fs::canonicalize(&joined)?;

        if !canonical.starts_with(&self.root) {
            tracing::warn!(path = %logical, "Symlink escape out of the root refused");
            return Err(FileError::AccessDenied);
        }

        Ok(canonical)
    }

    /// Returns whether the logical path names a directory inside the root.
    ///
    /// A path with nothing behind it is simply not a directory; only sandbox
    /// violations and unexpected I/O failures are reported as errors.
    pub fn is_directory(&self, logical: &str) -> Result<bool, FileError> {
        match self.resolve(logical) {
            Ok(path) => Ok(path.is_dir()),
            Err(FileError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Reads the whole file behind a logical path.
    pub async fn read_bytes(&self, logical: &str) -> Result<Vec<u8>, FileError> {
        let path = self.resolve(logical)?;

        if path.is_dir() {
            return Err(FileError::NotFound);
        }

        Ok(tokio::fs::read(&path).await?)
    }

    /// Content type for the logical path, derived from its extension only.
    pub fn mime_type(&self, logical: &str) -> Result<&'static str, FileError> {
        mime::from_path(Path::new(logical)).ok_or(FileError::UnknownMimeType)
    }

    /// Writes `data` to a logical path inside the root, replacing any
    /// existing file.
    ///
    /// The parent directory must already exist. Data is written to a
    /// temporary sibling first and renamed into place, so concurrent readers
    /// see either the old or the new content.
    pub async fn write_bytes(&self, logical: &str, data: &[u8]) -> Result<PathBuf, FileError> {
        let target = self.join(logical)?;
        let file_name = target.file_name().ok_or(FileError::AccessDenied)?.to_owned();
        let parent = target.parent().ok_or(FileError::AccessDenied)?;

        let parent = tokio::fs::canonicalize(parent).await?;
        if !parent.starts_with(&self.root) {
            return Err(FileError::AccessDenied);
        }

        let target = parent.join(&file_name);
        let temp = parent.join(format!(
            ".{}.{}-{}.tmp",
            file_name.to_string_lossy(),
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed),
        ));

        tokio::fs::write(&temp, data).await?;

        if let Err(e) = tokio::fs::rename(&temp, &target).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        Ok(target)
    }

    /// Lexically joins a logical path onto the root, refusing to climb above it.
    fn join(&self, logical: &str) -> Result<PathBuf, FileError> {
        let mut joined = self.root.clone();

        for component in Path::new(logical).components() {
            match component {
                Component::Normal(part) => joined.push(part),
                Component::ParentDir => {
                    if joined == self.root {
                        tracing::warn!(path = %logical, "Path traversal attempt refused");
                        return Err(FileError::AccessDenied);
                    }
                    joined.pop();
                }
                Component::RootDir | Component::CurDir => {}
                Component::Prefix(_) => return Err(FileError::AccessDenied),
            }
        }

        Ok(joined)
    }
}
