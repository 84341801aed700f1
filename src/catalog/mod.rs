//! The fixed set of shared files and the listing page built from it.
//!
//! Entries are appended once at startup and never removed or reordered:
//! an entry's index is the identifier used in `/files/<n>` and `/icons/<n>`
//! for the whole process lifetime. The base URI is the only field written
//! after the catalog is shared with request handlers.

pub mod icons;
pub mod page;
pub mod size;

pub use icons::{IconLookup, ThemeIconLookup};
pub use size::format_size;

use crate::common::AppError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// One shareable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub index: usize,
    pub path: PathBuf,
    pub icon_path: Option<PathBuf>,
    pub display_size: String,
}

impl CatalogEntry {
    /// Base name used for display and for `Content-Disposition`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// `<user>@<host>` shown in the page header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub user: String,
    pub host: String,
}

impl Owner {
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
        }
    }

    /// Current login name and machine hostname.
    pub fn current() -> Self {
        let user = ["USER", "USERNAME", "LOGNAME"]
            .iter()
            .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| "unknown".to_string());
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "localhost".to_string());
        Self { user, host }
    }
}

pub struct FileCatalog {
    entries: Vec<CatalogEntry>,
    // Swapped whole on every server start so readers never see a partial value.
    base_uri: RwLock<Arc<str>>,
    owner: Owner,
}

impl FileCatalog {
    pub fn new(owner: Owner) -> Self {
        Self {
            entries: Vec::new(),
            base_uri: RwLock::new(Arc::from("")),
            owner,
        }
    }

    /// Builds a catalog from paths in the order given, skipping non-files.
    pub fn from_paths<P: AsRef<Path>>(
        paths: impl IntoIterator<Item = P>,
        owner: Owner,
        icons: &dyn IconLookup,
    ) -> Self {
        let mut catalog = Self::new(owner);
        for path in paths {
            catalog.add(path, icons);
        }
        catalog
    }

    /// Appends a regular file. Anything else is skipped without error.
    /// Returns the assigned index.
    pub fn add(&mut self, path: impl AsRef<Path>, icons: &dyn IconLookup) -> Option<usize> {
        let path = path.as_ref();
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => {
                tracing::warn!(path = %path.display(), "not a regular file, skipping");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot read file, skipping: {}", e);
                return None;
            }
        };

        let index = self.entries.len();
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        self.entries.push(CatalogEntry {
            index,
            icon_path: icons.icon_for(&absolute),
            path: absolute,
            display_size: format_size(metadata.len()),
        });
        Some(index)
    }

    pub fn set_base_uri(&self, uri: &str) {
        let mut guard = self.base_uri.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::from(uri);
    }

    pub fn base_uri(&self) -> Arc<str> {
        self.base_uri
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn entry_at(&self, index: usize) -> Result<&CatalogEntry, AppError> {
        self.entries.get(index).ok_or(AppError::Index {
            index,
            len: self.entries.len(),
        })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Complete HTML listing with links under the current base URI.
    pub fn render_index_page(&self) -> Vec<u8> {
        let base = self.base_uri();
        page::render(&base, &self.entries, &self.owner.user, &self.owner.host).into_bytes()
    }
}
