//! Icon lookup for catalog entries.
//!
//! Resolves a file's MIME type to an icon file from the installed
//! freedesktop icon themes.

use crate::common::config::IconSettings;
use directories::BaseDirs;
use std::path::{Path, PathBuf};

const FALLBACK_MIME: &str = "text/plain";
const EXTENSIONS: [&str; 2] = ["png", "svg"];

/// Finds the icon file shown next to a shared file.
pub trait IconLookup {
    fn icon_for(&self, path: &Path) -> Option<PathBuf>;
}

/// Searches icon theme directories on disk.
#[derive(Debug, Clone)]
pub struct ThemeIconLookup {
    roots: Vec<PathBuf>,
    themes: Vec<String>,
    size: u32,
}

impl ThemeIconLookup {
    pub fn new(roots: Vec<PathBuf>, themes: Vec<String>, size: u32) -> Self {
        Self {
            roots,
            themes,
            size,
        }
    }

    /// Lookup over the standard XDG icon locations.
    pub fn from_settings(settings: &IconSettings) -> Self {
        Self::new(
            default_icon_roots(),
            settings.themes.clone(),
            settings.size,
        )
    }

    fn theme_subdirs(&self) -> Vec<String> {
        let s = self.size;
        vec![
            format!("{s}x{s}/mimetypes"),
            "scalable/mimetypes".to_string(),
            format!("mimetypes/{s}"),
            "mimetypes/scalable".to_string(),
        ]
    }

    fn find_named(&self, names: &[String]) -> Option<PathBuf> {
        let subdirs = self.theme_subdirs();
        for name in names {
            for root in &self.roots {
                for theme in &self.themes {
                    let theme_dir = root.join(theme);
                    for subdir in &subdirs {
                        let dir = theme_dir.join(subdir);
                        if let Some(found) = probe(&dir, name) {
                            return Some(found);
                        }
                    }
                }
                // unthemed locations like /usr/share/pixmaps
                if let Some(found) = probe(root, name) {
                    return Some(found);
                }
            }
        }
        None
    }
}

impl IconLookup for ThemeIconLookup {
    fn icon_for(&self, path: &Path) -> Option<PathBuf> {
        let mime = mime_guess::from_path(path).first_raw();

        if let Some(mime) = mime {
            if let Some(found) = self.find_named(&icon_names(mime)) {
                return Some(found);
            }
        }

        let found = self.find_named(&icon_names(FALLBACK_MIME));
        if found.is_none() {
            tracing::debug!(path = %path.display(), "no icon found");
        }
        found
    }
}

/// Icon names for a MIME type, most specific first: `text-html`, `text-x-generic`.
pub fn icon_names(mime: &str) -> Vec<String> {
    let mut names = vec![mime.replace('/', "-")];
    if let Some((top, _)) = mime.split_once('/') {
        let generic = format!("{top}-x-generic");
        if !names.contains(&generic) {
            names.push(generic);
        }
    }
    names
}

fn probe(dir: &Path, name: &str) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|candidate| candidate.is_file())
}

fn default_icon_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Some(dirs) = BaseDirs::new() {
        roots.push(dirs.data_dir().join("icons"));
        roots.push(dirs.home_dir().join(".icons"));
    }

    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    roots.extend(
        data_dirs
            .split(':')
            .filter(|d| !d.is_empty())
            .map(|d| PathBuf::from(d).join("icons")),
    );

    roots.push(PathBuf::from("/usr/share/pixmaps"));
    roots
}
