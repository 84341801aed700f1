//! Router definition for the file-sharing surface.

use crate::catalog::FileCatalog;
use crate::server::handlers;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Build the router for one server instance over one catalog.
///
/// Priority: index page, icons, files, then 404 for everything else.
/// Non-numeric indices are answered with 404 by the handlers.
pub fn create_router(catalog: Arc<FileCatalog>) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/index.html", get(handlers::index_handler))
        .route("/icons/:index", get(handlers::icon_handler))
        .route("/files/:index", get(handlers::file_handler))
        .fallback(handlers::not_found)
        .with_state(catalog)
}
