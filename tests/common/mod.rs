#![allow(dead_code)]

pub mod config_test_utils;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use qrshare::catalog::{FileCatalog, IconLookup, Owner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const SVG_ICON: &[u8] =
    br##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><circle cx="12" cy="12" r="10" fill="#2C001E"/></svg>"##;
pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Returns the same icon for every file.
pub struct StaticIcon(pub Option<PathBuf>);

impl IconLookup for StaticIcon {
    fn icon_for(&self, _: &Path) -> Option<PathBuf> {
        self.0.clone()
    }
}

pub fn setup_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

pub fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

pub fn test_owner() -> Owner {
    Owner::new("tester", "testhost")
}

pub fn build_catalog(paths: &[PathBuf], icons: &dyn IconLookup) -> Arc<FileCatalog> {
    Arc::new(FileCatalog::from_paths(paths, test_owner(), icons))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request"),
    )
    .await
    .expect("router is infallible")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub fn header<'a>(response: &'a Response<Body>, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("missing {name} header"))
        .to_str()
        .expect("header value is valid UTF-8")
}

/// Client that never routes loopback requests through an env proxy.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build client")
}
