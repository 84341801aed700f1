//! Local-network service advertisement (mDNS / DNS-SD).
//!
//! The session publishes one record per running server and withdraws it
//! before the server stops. Failures here are never fatal: the access URI
//! still works when typed in by hand.

use crate::common::config::ServiceSettings;
use anyhow::{Context, Result};
use mdns_sd::{ServiceDaemon, ServiceInfo};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};

/// Everything a discovery client needs to reach the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub service_type: String,
    pub instance_name: String,
    pub address: Ipv4Addr,
    pub port: u16,
    pub attributes: Vec<(String, String)>,
}

impl ServiceRecord {
    /// Record for a server at `address:port`, TXT attributes
    /// `product`, `vendor`, `version`, `path`.
    pub fn new(settings: &ServiceSettings, address: Ipv4Addr, port: u16) -> Self {
        Self {
            service_type: settings.service_type.clone(),
            instance_name: settings.product.clone(),
            address,
            port,
            attributes: vec![
                ("product".to_string(), settings.product.clone()),
                ("vendor".to_string(), settings.vendor.clone()),
                ("version".to_string(), env!("CARGO_PKG_VERSION").to_string()),
                ("path".to_string(), "/".to_string()),
            ],
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Publishes and withdraws the record describing the running server.
///
/// Callers never publish twice without an unpublish in between, and never
/// unpublish when nothing is published.
pub trait Advertiser: Send {
    fn publish(&mut self, record: &ServiceRecord) -> Result<()>;
    fn unpublish(&mut self) -> Result<()>;
}

/// Used when advertisement is disabled in config.
#[derive(Debug, Default)]
pub struct NoopAdvertiser;

impl Advertiser for NoopAdvertiser {
    fn publish(&mut self, record: &ServiceRecord) -> Result<()> {
        tracing::debug!(port = record.port, "service advertisement disabled");
        Ok(())
    }

    fn unpublish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Multicast DNS responder. The daemon starts lazily on first publish and
/// lives until the advertiser is dropped.
pub struct MdnsAdvertiser {
    daemon: Option<ServiceDaemon>,
    host_name: String,
    published: Option<String>,
}

impl MdnsAdvertiser {
    pub fn new(host: &str) -> Self {
        Self {
            daemon: None,
            host_name: format!("{}.local.", host.trim_end_matches('.')),
            published: None,
        }
    }

    fn daemon(&mut self) -> Result<&ServiceDaemon> {
        if self.daemon.is_none() {
            let daemon = ServiceDaemon::new().context("Failed to start mDNS daemon")?;
            self.daemon = Some(daemon);
        }
        self.daemon
            .as_ref()
            .context("mDNS daemon unavailable")
    }
}

impl Advertiser for MdnsAdvertiser {
    fn publish(&mut self, record: &ServiceRecord) -> Result<()> {
        let properties: HashMap<String, String> = record.attributes.iter().cloned().collect();
        let info = ServiceInfo::new(
            &record.service_type,
            &record.instance_name,
            &self.host_name,
            IpAddr::V4(record.address),
            record.port,
            properties,
        )
        .context("Failed to build service record")?;

        let fullname = info.get_fullname().to_string();
        self.daemon()?
            .register(info)
            .context("Failed to register service record")?;

        tracing::info!(service = %fullname, port = record.port, "service advertised");
        self.published = Some(fullname);
        Ok(())
    }

    fn unpublish(&mut self) -> Result<()> {
        let Some(fullname) = self.published.take() else {
            return Ok(());
        };
        if let Some(daemon) = &self.daemon {
            daemon
                .unregister(&fullname)
                .context("Failed to withdraw service record")?;
            tracing::info!(service = %fullname, "service withdrawn");
        }
        Ok(())
    }
}

impl Drop for MdnsAdvertiser {
    fn drop(&mut self) {
        if let Some(daemon) = self.daemon.take() {
            if let Err(e) = daemon.shutdown() {
                tracing::warn!("mDNS daemon shutdown failed: {}", e);
            }
        }
    }
}
