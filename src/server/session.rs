//! Session lifecycle: which interface is served, and the server plus
//! advertisement bound to it.
//!
//! `Idle` has no server. `Active` has exactly one running server and (when
//! advertisement succeeded) one published record for `interfaces[active_index]`.

use crate::catalog::FileCatalog;
use crate::common::config::{AppConfig, ServiceSettings};
use crate::common::AppError;
use crate::server::process::ServerProcess;
use crate::transport::advertise::{Advertiser, ServiceRecord};
use crate::transport::interfaces::{initial_index, list_interfaces, NetworkInterface};
use crate::transport::local::{access_uri, pick_port};
use std::sync::Arc;
use std::time::Duration;

/// What the UI shows after every (re)start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPoint {
    pub interface_name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// 0 picks a fresh ephemeral port on every start.
    pub port: u16,
    pub service: ServiceSettings,
    pub shutdown_grace: Duration,
}

impl From<&AppConfig> for SessionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            port: config.port,
            service: config.service.clone(),
            shutdown_grace: config.shutdown_grace(),
        }
    }
}

pub struct SessionController {
    interfaces: Vec<NetworkInterface>,
    active_index: usize,
    catalog: Arc<FileCatalog>,
    server: ServerProcess,
    advertiser: Box<dyn Advertiser>,
    advertised: bool,
    settings: SessionSettings,
    current: Option<AccessPoint>,
}

impl SessionController {
    /// Idle controller over an explicit interface list.
    pub fn new(
        interfaces: Vec<NetworkInterface>,
        active_index: usize,
        catalog: Arc<FileCatalog>,
        advertiser: Box<dyn Advertiser>,
        settings: SessionSettings,
    ) -> Result<Self, AppError> {
        if interfaces.is_empty() {
            return Err(AppError::NoInterfaces);
        }
        if active_index >= interfaces.len() {
            return Err(AppError::InvalidState(format!(
                "interface index {active_index} out of range ({} interfaces)",
                interfaces.len()
            )));
        }

        let server = ServerProcess::new(catalog.clone(), settings.shutdown_grace);
        Ok(Self {
            interfaces,
            active_index,
            catalog,
            server,
            advertiser,
            advertised: false,
            settings,
            current: None,
        })
    }

    /// Enumerates interfaces, picks the initial one, and starts serving.
    pub async fn initialize(
        catalog: Arc<FileCatalog>,
        advertiser: Box<dyn Advertiser>,
        settings: SessionSettings,
    ) -> Result<Self, AppError> {
        let interfaces = list_interfaces()?;
        let index = initial_index(&interfaces);
        let mut controller = Self::new(interfaces, index, catalog, advertiser, settings)?;
        controller.activate().await?;
        Ok(controller)
    }

    pub fn state(&self) -> SessionState {
        if self.current.is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    pub fn access_point(&self) -> Option<&AccessPoint> {
        self.current.as_ref()
    }

    pub fn interfaces(&self) -> &[NetworkInterface] {
        &self.interfaces
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_interface(&self) -> &NetworkInterface {
        &self.interfaces[self.active_index]
    }

    pub fn server(&self) -> &ServerProcess {
        &self.server
    }

    /// `Idle -> Active` on the current interface.
    pub async fn activate(&mut self) -> Result<AccessPoint, AppError> {
        if self.state() != SessionState::Idle {
            return Err(AppError::InvalidState("session already active".to_string()));
        }
        self.start_sequence().await
    }

    /// Stops the current server, advances (wrapping) to the next interface,
    /// and starts again. Returns once the new server accepts connections.
    pub async fn switch_to_next_interface(&mut self) -> Result<AccessPoint, AppError> {
        if self.state() != SessionState::Active {
            return Err(AppError::InvalidState(
                "switch requires an active session".to_string(),
            ));
        }
        self.stop_sequence().await?;
        self.active_index = (self.active_index + 1) % self.interfaces.len();
        tracing::info!(
            interface = %self.interfaces[self.active_index].name,
            "switching interface"
        );
        self.start_sequence().await
    }

    /// `Active -> Idle`.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        if self.state() != SessionState::Active {
            return Err(AppError::InvalidState(
                "shutdown requires an active session".to_string(),
            ));
        }
        self.stop_sequence().await?;
        tracing::info!("session shut down");
        Ok(())
    }

    // The catalog must carry the new base URI before the listener exists so
    // no request can render links against a stale address.
    async fn start_sequence(&mut self) -> Result<AccessPoint, AppError> {
        let iface = self.interfaces[self.active_index].clone();
        let port = pick_port(iface.ipv4, self.settings.port)?;
        let uri = access_uri(iface.ipv4, port);

        self.catalog.set_base_uri(&uri);
        self.server.start(iface.ipv4, port).await?;

        let record = ServiceRecord::new(&self.settings.service, iface.ipv4, port);
        match self.advertiser.publish(&record) {
            Ok(()) => self.advertised = true,
            Err(e) => tracing::warn!("service advertisement failed: {:#}", e),
        }

        let access_point = AccessPoint {
            interface_name: iface.name,
            uri,
        };
        tracing::info!(
            interface = %access_point.interface_name,
            uri = %access_point.uri,
            "session active"
        );
        self.current = Some(access_point.clone());
        Ok(access_point)
    }

    // Advertisement goes first so nobody discovers a server that is going away.
    async fn stop_sequence(&mut self) -> Result<(), AppError> {
        if self.advertised {
            if let Err(e) = self.advertiser.unpublish() {
                tracing::warn!("service withdrawal failed: {:#}", e);
            }
            self.advertised = false;
        }
        self.current = None;
        self.server.stop().await
    }
}
