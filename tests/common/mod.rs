//! Shared fixture: a throwaway document root with a secret file next to it.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use stile::router::Router;
use stile::store::{CredentialStore, FileStore};

static NEXT_SITE: AtomicUsize = AtomicUsize::new(0);

pub const INDEX_HTML: &[u8] = b"<h1>home</h1>";
pub const DOCS_INDEX_HTML: &[u8] = b"<h1>docs</h1>";
pub const README_TXT: &[u8] = b"hello from docs";
pub const LOGO_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];
pub const SECRET: &[u8] = b"top secret";

/// Layout:
///
/// ```text
/// <dir>/secret.txt
/// <dir>/public/index.html
/// <dir>/public/logo.png
/// <dir>/public/data.notatype
/// <dir>/public/Makefile
/// <dir>/public/docs/index.html
/// <dir>/public/docs/readme.txt
/// <dir>/public/empty/
/// ```
pub struct Site {
    pub dir: PathBuf,
    pub root: PathBuf,
}

impl Site {
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!(
            "stile-test-{}-{}",
            std::process::id(),
            NEXT_SITE.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = std::fs::remove_dir_all(&dir);

        let root = dir.join("public");
        std::fs::create_dir_all(root.join("docs")).unwrap();
        std::fs::create_dir_all(root.join("empty")).unwrap();

        std::fs::write(dir.join("secret.txt"), SECRET).unwrap();
        std::fs::write(root.join("index.html"), INDEX_HTML).unwrap();
        std::fs::write(root.join("logo.png"), LOGO_PNG).unwrap();
        std::fs::write(root.join("data.notatype"), b"opaque").unwrap();
        std::fs::write(root.join("Makefile"), b"all:").unwrap();
        std::fs::write(root.join("docs/index.html"), DOCS_INDEX_HTML).unwrap();
        std::fs::write(root.join("docs/readme.txt"), README_TXT).unwrap();

        Self { dir, root }
    }

    pub fn files(&self) -> FileStore {
        FileStore::new(&self.root).unwrap()
    }

    pub fn credentials() -> CredentialStore {
        let mut users = HashMap::new();
        users.insert("alice".to_string(), "secret".to_string());
        users.insert("bob".to_string(), "hunter2".to_string());
        CredentialStore::from_map(users)
    }

    pub fn router(&self) -> Router {
        Router::new(self.files(), Self::credentials())
    }
}

impl Drop for Site {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
