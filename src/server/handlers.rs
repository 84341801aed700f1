//! HTTP handlers for the listing page, icons, and file downloads.

use anyhow::Context;
use axum::{
    body::Body,
    extract::State,
    http::{header, Response, Uri},
    response::IntoResponse,
};
use std::path::Path;
use std::sync::Arc;

use crate::catalog::page::{FILE_DIR, ICON_DIR};
use crate::catalog::FileCatalog;
use crate::common::AppError;
use crate::server::raster::{self, ICON_SIZE};

const FALLBACK_MIME: &str = "application/octet-stream";

fn index_headers() -> [(header::HeaderName, &'static str); 3] {
    [
        (header::CONTENT_TYPE, "text/html; charset=utf-8"),
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::REFERRER_POLICY, "no-referrer"),
    ]
}

/// `GET /` and `GET /index.html`
pub async fn index_handler(State(catalog): State<Arc<FileCatalog>>) -> impl IntoResponse {
    tracing::debug!(entries = catalog.len(), "serving index");
    (index_headers(), catalog.render_index_page())
}

/// `GET /icons/:index`: SVG icons are rasterized to PNG, others served as-is.
pub async fn icon_handler(
    uri: Uri,
    State(catalog): State<Arc<FileCatalog>>,
) -> Result<Response<Body>, AppError> {
    let index = path_index(&uri, ICON_DIR)?;
    let icon_path = catalog
        .entry_at(index)?
        .icon_path
        .clone()
        .ok_or_else(|| AppError::NotFound(format!("no icon for entry {index}")))?;

    let mime = guess_mime(&icon_path);
    let data = read_whole(&icon_path).await?;

    let (content_type, body) = if raster::is_svg(&mime) {
        let png = tokio::task::spawn_blocking(move || raster::svg_to_png(&data, ICON_SIZE))
            .await
            .context("rasterize task failed")?
            .map_err(|e| {
                tracing::warn!(path = %icon_path.display(), "icon rasterization failed: {:#}", e);
                AppError::NotFound(format!("icon {index}"))
            })?;
        ("image/png".to_string(), png)
    } else {
        (mime, data)
    };

    Ok(Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .context("build response")?)
}

/// `GET /files/:index`: whole file as an attachment download.
pub async fn file_handler(
    uri: Uri,
    State(catalog): State<Arc<FileCatalog>>,
) -> Result<Response<Body>, AppError> {
    let index = path_index(&uri, FILE_DIR)?;
    let entry = catalog.entry_at(index)?;

    let data = read_whole(&entry.path).await?;
    tracing::info!(index, name = %entry.file_name(), bytes = data.len(), "serving file");

    Ok(Response::builder()
        .header(header::CONTENT_TYPE, guess_mime(&entry.path))
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&entry.file_name()),
        )
        .body(Body::from(data))
        .context("build response")?)
}

pub async fn not_found() -> AppError {
    AppError::NotFound("no such route".to_string())
}

/// Index from the raw, undecoded request path `/<dir>/<n>`, so `%30` is not
/// accepted as `0`.
pub fn path_index(uri: &Uri, dir: &str) -> Result<usize, AppError> {
    let raw = uri
        .path()
        .strip_prefix('/')
        .and_then(|p| p.strip_prefix(dir))
        .and_then(|p| p.strip_prefix('/'))
        .ok_or_else(|| AppError::NotFound(format!("no {dir} index in {}", uri.path())))?;
    parse_index(raw)
}

/// Non-empty run of ASCII digits. Anything else is a route miss.
pub fn parse_index(raw: &str) -> Result<usize, AppError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::NotFound(format!("invalid index {raw:?}")));
    }
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("invalid index {raw:?}")))
}

pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME)
        .to_string()
}

/// `attachment; filename="<name>"` with quotes and control characters neutralized.
pub fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

/// Unreadable files become 404s so one bad path never affects the listener.
async fn read_whole(path: &Path) -> Result<Vec<u8>, AppError> {
    tokio::fs::read(path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), "read failed: {}", e);
        AppError::NotFound(path.display().to_string())
    })
}
