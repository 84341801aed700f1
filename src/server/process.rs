//! One bound HTTP listener and its lifecycle.

use crate::catalog::FileCatalog;
use crate::common::AppError;
use crate::server::routes;
use crate::transport::local::bind_serving_listener;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

struct RunningServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

/// Serves one catalog. `start` is valid only from `Stopped`, `stop` only
/// from `Running`; the owner never runs two transitions at once.
pub struct ServerProcess {
    catalog: Arc<FileCatalog>,
    grace: Duration,
    state: ServerState,
    running: Option<RunningServer>,
}

impl ServerProcess {
    pub fn new(catalog: Arc<FileCatalog>, grace: Duration) -> Self {
        Self {
            catalog,
            grace,
            state: ServerState::Stopped,
            running: None,
        }
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    /// Bound address while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.addr)
    }

    /// Binds `address:port` and starts serving in the background. Connections
    /// queue on the socket as soon as this returns.
    #[tracing::instrument(skip(self))]
    pub async fn start(&mut self, address: Ipv4Addr, port: u16) -> Result<SocketAddr, AppError> {
        if self.state != ServerState::Stopped {
            return Err(AppError::InvalidState(format!(
                "start requires Stopped, server is {:?}",
                self.state
            )));
        }
        self.state = ServerState::Starting;

        let (addr, listener) = match bind_serving_listener(SocketAddr::from((address, port))) {
            Ok(bound) => bound,
            Err(e) => {
                self.state = ServerState::Stopped;
                return Err(e);
            }
        };

        let app = routes::create_router(self.catalog.clone());
        let (shutdown, shutdown_signal) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_signal.await;
                })
                .await
        });

        self.running = Some(RunningServer {
            addr,
            shutdown,
            task,
        });
        self.state = ServerState::Running;
        tracing::info!(%addr, "server running");
        Ok(addr)
    }

    /// Stops accepting and releases the listening socket right away. Idle
    /// keep-alive connections are closed; in-flight responses get up to the
    /// grace period, after which `stop` returns without waiting for them.
    pub async fn stop(&mut self) -> Result<(), AppError> {
        if self.state != ServerState::Running {
            return Err(AppError::InvalidState(format!(
                "stop requires Running, server is {:?}",
                self.state
            )));
        }
        self.state = ServerState::Stopping;

        if let Some(running) = self.running.take() {
            let RunningServer {
                addr,
                shutdown,
                mut task,
            } = running;
            let _ = shutdown.send(());

            match tokio::time::timeout(self.grace, &mut task).await {
                Ok(Ok(Ok(()))) => {}
                Ok(Ok(Err(e))) => tracing::warn!(%addr, "server exited with error: {}", e),
                Ok(Err(e)) => tracing::warn!(%addr, "server task failed: {}", e),
                Err(_) => {
                    tracing::warn!(%addr, grace = ?self.grace, "responses still in flight after grace period");
                    task.abort();
                    let _ = task.await;
                }
            }
            tracing::info!(%addr, "server stopped");
        }

        self.state = ServerState::Stopped;
        Ok(())
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            let _ = running.shutdown.send(());
            running.task.abort();
        }
    }
}
