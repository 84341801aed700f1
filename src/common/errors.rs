//! Error taxonomy shared by the catalog, server, and session layers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The OS interface query itself failed. Fatal to startup.
    #[error("failed to enumerate network interfaces: {0}")]
    Enumeration(#[source] std::io::Error),

    #[error("no network interface with an IPv4 address")]
    NoInterfaces,

    /// Address/port could not be bound. Never retried automatically.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("catalog index {index} out of range ({len} entries)")]
    Index { index: usize, len: usize },

    #[error("invalid lifecycle transition: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::Index { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("{}", self);
            (status, "File Not Found").into_response()
        } else {
            tracing::error!("request failed: {:#}", self);
            (status, "Internal Server Error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_errors_map_to_not_found() {
        let err = AppError::Index { index: 4, len: 2 };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_errors_map_to_server_error() {
        let err = AppError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
